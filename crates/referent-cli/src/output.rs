use std::io::Write;

use owo_colors::OwoColorize;
use referent_core::{
    ExtractedFields, Issue, ReferenceType, Style, ValidationReport, ValidationResult, policy,
};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }
    Ok(())
}

fn print_fields(
    w: &mut dyn Write,
    fields: &ExtractedFields,
    color: ColorMode,
) -> std::io::Result<()> {
    for (field, value) in fields.iter() {
        if color.enabled() {
            writeln!(w, "      {}: {}", field.dimmed(), value)?;
        } else {
            writeln!(w, "      {}: {}", field, value)?;
        }
    }
    Ok(())
}

fn print_issues(w: &mut dyn Write, errors: &[Issue], color: ColorMode) -> std::io::Result<()> {
    for issue in errors {
        if !color.enabled() {
            writeln!(w, "      - {}", issue)?;
        } else if issue.is_soft() {
            writeln!(w, "      - {}", issue.yellow())?;
        } else {
            writeln!(w, "      - {}", issue.red())?;
        }
    }
    Ok(())
}

/// Print the valid and invalid groups of a batch.
pub fn print_report(
    w: &mut dyn Write,
    report: &ValidationReport,
    color: ColorMode,
) -> std::io::Result<()> {
    if !report.valid.is_empty() {
        heading(w, "VALID REFERENCES", color)?;
        for v in &report.valid {
            let tag = format!("[{}] {}", v.index + 1, v.reference_type);
            if color.enabled() {
                writeln!(w, "{} {}", tag.green(), v.reference)?;
            } else {
                writeln!(w, "{} {}", tag, v.reference)?;
            }
            if let Some(journal) = &v.journal {
                let issn = journal.issn.as_deref().unwrap_or("-");
                writeln!(
                    w,
                    "      journal registry: {} (ISSN {})",
                    journal.journal, issn
                )?;
            }
        }
        writeln!(w)?;
    }

    if !report.invalid.is_empty() {
        heading(w, "INVALID REFERENCES", color)?;
        for i in &report.invalid {
            let tag = format!("[{}] {}", i.index + 1, i.reference_type);
            if color.enabled() {
                writeln!(w, "{} {}", tag.red(), i.original.trim())?;
            } else {
                writeln!(w, "{} {}", tag, i.original.trim())?;
            }
            print_issues(w, &i.errors, color)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Print the totals for a batch.
pub fn print_summary(
    w: &mut dyn Write,
    report: &ValidationReport,
    style: Style,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, "SUMMARY", color)?;
    writeln!(w, "  Style: {}", style)?;
    writeln!(w, "  References analyzed: {}", report.len())?;
    if color.enabled() {
        writeln!(w, "  {} {}", "Valid:".green(), report.valid.len())?;
        writeln!(w, "  {} {}", "Invalid:".red(), report.invalid.len())?;
    } else {
        writeln!(w, "  Valid: {}", report.valid.len())?;
        writeln!(w, "  Invalid: {}", report.invalid.len())?;
    }
    let matched = report.valid.iter().filter(|v| v.journal.is_some()).count();
    if matched > 0 {
        writeln!(w, "  In journal registry: {}", matched)?;
    }
    Ok(())
}

/// Every stage of validating one reference, for `referent classify`.
pub struct Diagnosis<'a> {
    pub cleaned: &'a str,
    pub style: Style,
    pub basic_errors: &'a [Issue],
    /// `None` when basic validation failed and classification was skipped.
    pub detected: Option<&'a Result<ReferenceType, Issue>>,
    pub fields: &'a ExtractedFields,
    pub result: &'a ValidationResult,
}

/// Print every stage for one reference: cleaning, basic checks,
/// classification, extraction and the final result.
pub fn print_classification(
    w: &mut dyn Write,
    d: &Diagnosis<'_>,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Reference: {}", d.cleaned)?;
    writeln!(w, "Style:     {}", d.style)?;

    if d.basic_errors.is_empty() {
        writeln!(w, "Basic:     ok")?;
    } else {
        writeln!(w, "Basic:     failed")?;
        print_issues(w, d.basic_errors, color)?;
    }

    match d.detected {
        Some(Ok(t)) => writeln!(w, "Detected:  {} ({})", t, t.slug())?,
        Some(Err(issue)) => {
            writeln!(w, "Detected:  {}", ReferenceType::Undetermined)?;
            print_issues(w, std::slice::from_ref(issue), color)?;
        }
        None => writeln!(w, "Detected:  {}", ReferenceType::Undetermined)?,
    }

    if !d.fields.is_empty() {
        writeln!(w, "Fields:")?;
        print_fields(w, d.fields, color)?;
    }

    let result = d.result;
    if result.is_valid {
        if color.enabled() {
            writeln!(w, "Result:    {}", "VALID".green())?;
        } else {
            writeln!(w, "Result:    VALID")?;
        }
    } else {
        if color.enabled() {
            writeln!(w, "Result:    {}", "INVALID".red())?;
        } else {
            writeln!(w, "Result:    INVALID")?;
        }
        print_issues(w, &result.errors, color)?;
    }
    Ok(())
}

/// List styles, subtypes and their field policies.
pub fn print_styles(w: &mut dyn Write, color: ColorMode) -> std::io::Result<()> {
    for style in Style::ALL {
        if color.enabled() {
            writeln!(w, "{}", style.bold())?;
        } else {
            writeln!(w, "{}", style)?;
        }
        for &subtype in style.subtypes() {
            print_subtype(w, subtype)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn print_subtype(w: &mut dyn Write, subtype: ReferenceType) -> std::io::Result<()> {
    writeln!(w, "  {} ({})", subtype, subtype.slug())?;
    if let Some(p) = policy(subtype) {
        let join = |fields: &[referent_core::Field]| {
            fields
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(w, "      required: {}", join(p.required))?;
        writeln!(w, "      optional: {}", join(p.optional))?;
    }
    Ok(())
}
