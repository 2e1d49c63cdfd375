#![forbid(unsafe_code)]
use chrono::NaiveDate;
use escala::holidays::{compute_easter, get_all_holidays, is_special_period};
use escala::{
    HolidayCalendar, HolidayInput, HolidayKind, HolidayResolver, JsonStorage, MemoryStorage,
    OrgId,
};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn national_calendar_2024_is_complete() {
    let all = get_all_holidays(2024);
    let dates: Vec<NaiveDate> = all.iter().map(|h| h.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 1, 1),
            date(2024, 2, 13),
            date(2024, 3, 29),
            date(2024, 4, 21),
            date(2024, 5, 1),
            date(2024, 5, 30),
            date(2024, 9, 7),
            date(2024, 10, 12),
            date(2024, 11, 2),
            date(2024, 11, 15),
            date(2024, 12, 25),
        ]
    );
    assert!(all.iter().all(|h| h.kind == HolidayKind::National));
    assert_eq!(compute_easter(2024), Some(date(2024, 3, 31)));
}

#[test]
fn special_period_is_exactly_the_last_week() {
    assert!(!is_special_period(date(2024, 12, 25)));
    assert!(is_special_period(date(2024, 12, 26)));
    assert!(is_special_period(date(2024, 12, 31)));
    assert!(!is_special_period(date(2025, 1, 1)));
}

#[test]
fn export_then_import_into_a_fresh_resolver() {
    let mut source = HolidayResolver::new(OrgId::new("org"), MemoryStorage::new());
    source
        .add_custom_holiday(HolidayInput::new(
            "2024-07-15",
            "Aniversário da empresa",
            HolidayKind::Organizational,
        ))
        .unwrap();
    source
        .add_custom_holiday(
            HolidayInput::new("2024-08-15", "Assunção", HolidayKind::Regional)
                .with_bonus(Decimal::new(15, 1)),
        )
        .unwrap();
    let json = source.export_custom_holidays().unwrap();

    let mut target = HolidayResolver::new(OrgId::new("org"), MemoryStorage::new());
    assert_eq!(target.import_custom_holidays(&json).unwrap(), 2);
    let list = target.list_custom_holidays(2024).unwrap();
    assert_eq!(list, source.list_custom_holidays(2024).unwrap());
    assert_eq!(list[0].date, date(2024, 7, 15));
    assert_eq!(list[1].date, date(2024, 8, 15));
    assert_eq!(list[1].bonus_rest_days, Decimal::new(15, 1));
}

#[test]
fn export_uses_the_wire_field_names() {
    let mut r = HolidayResolver::new(OrgId::new("org"), MemoryStorage::new());
    let mut input = HolidayInput::new("2024-07-15", "Fundação", HolidayKind::Organizational);
    input.is_major = true;
    r.add_custom_holiday(input).unwrap();

    let json = r.export_custom_holidays().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entry = &value["2024"][0];
    assert_eq!(entry["data"], "2024-07-15");
    assert_eq!(entry["nome"], "Fundação");
    assert_eq!(entry["tipo"], "organizacional");
    assert_eq!(entry["folgasAdicionais"].as_f64(), Some(1.0));
    assert_eq!(entry["principal"], true);
    assert!(entry.get("afetaEscala").is_none());
}

#[test]
fn json_store_survives_a_new_resolver_instance() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feriados.json");
    {
        let mut r = HolidayResolver::new(OrgId::new("org"), JsonStorage::open(&path).unwrap());
        r.add_custom_holiday(HolidayInput::new("2025-01-20", "São Sebastião", HolidayKind::Regional))
            .unwrap();
    }

    let r = HolidayResolver::new(OrgId::new("org"), JsonStorage::open(&path).unwrap());
    // année lue dans le fichier au premier accès
    assert!(!r.is_loaded(2025));
    assert_eq!(r.holiday_on(date(2025, 1, 20)).unwrap().name, "São Sebastião");
    assert!(r.is_weekend_rotation(date(2025, 1, 20)));
    assert!(r.is_loaded(2025));
}

#[test]
fn resolvers_of_different_orgs_do_not_share_holidays() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feriados.json");
    let mut a = HolidayResolver::new(OrgId::new("a"), JsonStorage::open(&path).unwrap());
    let mut b = HolidayResolver::new(OrgId::new("b"), JsonStorage::open(&path).unwrap());

    a.add_custom_holiday(HolidayInput::new("2024-07-15", "A", HolidayKind::Organizational))
        .unwrap();
    a.load_year(2024).unwrap();
    b.load_year(2024).unwrap();

    assert!(a.holiday_on(date(2024, 7, 15)).is_some());
    assert!(b.holiday_on(date(2024, 7, 15)).is_none());
    assert!(b.list_custom_holidays(2024).unwrap().is_empty());
}

#[test]
fn malformed_import_is_rejected_atomically() {
    let mut r = HolidayResolver::new(OrgId::new("org"), MemoryStorage::new());
    r.add_custom_holiday(HolidayInput::new("2024-07-15", "A", HolidayKind::Organizational))
        .unwrap();

    // 2025 valide, 2024 invalide : rien ne doit être appliqué
    let json = r#"{
        "2025": [ { "data": "2025-03-01", "nome": "Ok", "tipo": "regional" } ],
        "2024": [ { "data": "2024-09-01", "nome": "Bad", "tipo": "municipal" } ]
    }"#;
    assert!(r.import_custom_holidays(json).is_err());
    assert_eq!(r.list_custom_holidays(2024).unwrap().len(), 1);
    assert!(r.list_custom_holidays(2025).unwrap().is_empty());
}
