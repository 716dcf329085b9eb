//! End-to-end batch validation across all three styles.

use referent_core::{
    Field, GostType, Issue, IssueKind, JournalRegistry, ReferenceType, ReferenceValidator, Style,
    ValidatorConfigBuilder, validate_references,
};

const GOST_REFS: [&str; 7] = [
    "1. Пакшина С.М. Передвижение солей в почве // Почвоведение. 1980. Т. 5. № 3. С. 45–50.",
    "2. Ким С. Ю. Искусственный интеллект и право. — Казань: Университетская книга, 2024. 280 с.",
    "3. Материалы конференции «Почва» / под ред. И.И. Иванова. — СПб.: Питер, 2015. 300 с.",
    "4. Иванов И.И. Новая статья // Вестник науки. 2024. В печати.",
    "5. Петров П.П. Цифровая экономика // Экономика. 2023. URL: https://econ.ru/a/1 (дата обращения: 01.02.2024).",
    "6. Книга без издателя, 2020",
    "7. Запись без года",
];

#[test]
fn gost_batch_is_partitioned_in_order() {
    let report = validate_references(&GOST_REFS, "GOST", None).unwrap();

    assert_eq!(report.len(), GOST_REFS.len());
    let valid: Vec<usize> = report.valid.iter().map(|v| v.index).collect();
    assert_eq!(valid, vec![0, 1, 2, 3, 4]);

    let types: Vec<ReferenceType> = report.valid.iter().map(|v| v.reference_type).collect();
    assert_eq!(
        types,
        vec![
            ReferenceType::Gost(GostType::JournalArticle),
            ReferenceType::Gost(GostType::Book),
            ReferenceType::Gost(GostType::ConferenceProceedings),
            ReferenceType::Gost(GostType::ArticleInPress),
            ReferenceType::Gost(GostType::OnlineArticle),
        ]
    );

    let no_publisher = &report.invalid[0];
    assert_eq!(no_publisher.index, 5);
    assert!(
        no_publisher
            .errors
            .iter()
            .any(|e| e.to_string() == "Отсутствует обязательное поле: publisher")
    );

    let no_year = &report.invalid[1];
    assert_eq!(no_year.errors, vec![Issue::MissingYear]);
    assert_eq!(no_year.reference_type, ReferenceType::Undetermined);
}

#[test]
fn address_abbreviation_is_expanded_in_report() {
    let report = validate_references(&GOST_REFS[2..3], "gost", None).unwrap();
    assert_eq!(
        report.valid[0].fields.get(Field::Address),
        Some("Санкт-Петербург")
    );
}

#[test]
fn apa_and_mla_references_validate() {
    let apa = [
        "Smith, J. A., & Doe, R. (2020). Title of article. Journal of Things, 15(3), 45–50. https://doi.org/10.1000/xyz123",
        "Brown, K. (2018). Deep Learning: A Primer. New York, NY: Penguin.",
    ];
    let report = validate_references(&apa, "APA", None).unwrap();
    assert_eq!(report.valid.len(), 2, "{:?}", report.invalid);
    assert_eq!(
        report.valid[0].fields.get(Field::Doi),
        Some("10.1000/xyz123")
    );

    let mla = [
        r#"Smith, John. "Advances in AI." Journal of Modern Science, vol. 10, no. 2, 2020, pp. 123-130."#,
        "Smith, John. The Book of Things. Penguin, 2020.",
    ];
    let report = validate_references(&mla, "mla", None).unwrap();
    assert_eq!(report.valid.len(), 2, "{:?}", report.invalid);
}

#[test]
fn requested_subtype_mismatch_lands_in_invalid_group() {
    let report = validate_references(&GOST_REFS[..1], "GOST", Some("Книга")).unwrap();
    assert!(report.valid.is_empty());
    let kinds: Vec<IssueKind> = report.invalid[0].errors.iter().map(Issue::kind).collect();
    assert_eq!(kinds, vec![IssueKind::TypeMismatch]);
}

#[test]
fn registry_annotates_valid_references() {
    let registry = JournalRegistry::from_csv_reader(
        "journal,ISSN\nПочвоведение,0032-180X\nВестник науки,1234-5678\n".as_bytes(),
    )
    .unwrap();
    let validator = ReferenceValidator::with_config(
        ValidatorConfigBuilder::new()
            .journal_registry(registry)
            .build()
            .unwrap(),
    );
    let report = validator.validate_batch(&GOST_REFS, Style::Gost, None);

    let annotated: Vec<(usize, &str)> = report
        .valid
        .iter()
        .filter_map(|v| v.journal.as_ref().map(|j| (v.index, j.journal.as_str())))
        .collect();
    assert_eq!(annotated, vec![(0, "Почвоведение"), (3, "Вестник науки")]);
}

#[test]
fn report_serializes_to_json() {
    let report = validate_references(&GOST_REFS[5..], "GOST", None).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["valid"].as_array().unwrap().len(), 0);
    let first = &json["invalid"][0];
    assert_eq!(first["reference_type"], "Книга");
    assert_eq!(first["errors"][0]["kind"], "completeness");
}
