//! Integration tests for turning Performance API answers into spend per day.

use ozon_report_api::{parse_spend_csv, parse_spend_json, select_campaign_ids, Campaign};
use ozon_report_common::test_utils::{assert_approx_eq, date};
use ozon_report_common::ReportWindow;
use serde_json::json;

#[test]
fn test_campaign_listing_to_statistics_window() {
    let listing = json!({
        "list": [
            {"id": "9001", "title": "Поиск", "state": "CAMPAIGN_STATE_RUNNING", "advObjectType": "SKU"},
            {"id": "9002", "title": "Баннер", "state": "CAMPAIGN_STATE_STOPPED"},
            {"id": 9003, "title": "Трафареты", "state": "CAMPAIGN_STATE_RUNNING"}
        ],
        "total": "3"
    });

    let campaigns = Campaign::list_from_value(&listing);
    let ids = select_campaign_ids(&campaigns, 10);
    assert_eq!(ids, vec!["9001", "9003"]);
}

#[test]
fn test_csv_report_covers_window() {
    let window = ReportWindow::new(date(2026, 1, 6), date(2026, 1, 19)).unwrap();
    let mut csv = String::from("ID;Название;Дата;Показы;Клики;Расход, ₽;Заказы, шт.;Заказы, ₽\n");
    for (i, day) in window.days().enumerate() {
        csv.push_str(&format!(
            "9001;Поиск;{};1000;30;{},50;4;3200\n",
            day.format("%d.%m.%Y"),
            1000 + i
        ));
    }

    let spend = parse_spend_csv(&csv).unwrap();

    assert_eq!(spend.len(), window.len());
    assert_approx_eq(spend.get(window.date_from), 1000.5, 1e-9);
    assert_approx_eq(spend.get(window.date_to), 1013.5, 1e-9);
    assert_approx_eq(spend.total(), (1000..1014).map(f64::from).sum::<f64>() + 7.0, 1e-6);
}

#[test]
fn test_json_and_csv_agree() {
    let from_csv = parse_spend_csv("Дата;Расход, ₽\n2026-01-18;1 200,00\n2026-01-19;800\n").unwrap();
    let from_json = parse_spend_json(&json!({
        "rows": [
            {"date": "2026-01-18", "spend": "1200"},
            {"date": "2026-01-19", "spend": 800}
        ]
    }));

    assert_eq!(from_csv, from_json);
}
