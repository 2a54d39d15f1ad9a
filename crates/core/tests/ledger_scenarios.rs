//! End-to-end ledger behaviour against the in-memory spreadsheet.

mod support;

use std::sync::Arc;

use futures::future::join_all;
use ordersheet_core::testing::{InMemorySpreadsheet, Operation, RecordedCall};
use ordersheet_domain::{header_row, CellValue, ErrorKind, RemoteError, StructuralRequest, WriteMode};
use support::{dec, ledger, order, text_row, SPREADSHEET_ID};

#[tokio::test]
async fn first_order_creates_worksheet_with_header() {
    let (service, sheet, _) = ledger(InMemorySpreadsheet::new(SPREADSHEET_ID));

    let summary = service
        .submit(&order("o1", "Widget", 3, "9.99", "4.50"), "cust42")
        .await
        .unwrap();

    assert!(summary.sheet_created);
    assert_eq!(summary.mode, Some(WriteMode::Overwrite));
    assert_eq!(summary.rows_written, 1);

    let rows = sheet.rows("cust42");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], header_row());
    assert_eq!(
        rows[1],
        vec![
            CellValue::Text("o1".into()),
            CellValue::Text("Widget".into()),
            CellValue::Integer(3),
            CellValue::Decimal(dec("9.99")),
            CellValue::Decimal(dec("4.50")),
        ]
    );
    assert_eq!(rows[1][4].to_string(), "4.50");

    let structural = sheet.calls().into_iter().find_map(|call| match call {
        RecordedCall::BatchUpdate { requests } => Some(requests),
        _ => None,
    });
    match structural.as_deref() {
        Some([StructuralRequest::AddWorksheet { title, layout }]) => {
            assert_eq!(title, "cust42");
            assert_eq!((layout.row_count, layout.column_count, layout.frozen_row_count), (500, 5, 1));
        }
        other => panic!("expected one add-worksheet request, got {other:?}"),
    }
}

#[tokio::test]
async fn batch_for_existing_worksheet_is_one_append() {
    let prior: Vec<_> = (1..=10).map(|n| text_row(&[format!("old{n}").as_str()])).collect();
    let (service, sheet, _) =
        ledger(InMemorySpreadsheet::new(SPREADSHEET_ID).with_worksheet("cust7", prior));

    let orders = vec![
        order("o1", "Widget", 1, "1.00", "0.50"),
        order("o2", "Gadget", 2, "2.00", "1.00"),
        order("o3", "Gizmo", 3, "3.00", "1.50"),
    ];
    let summary = service.submit_batch(&orders, "cust7").await.unwrap();

    assert!(!summary.sheet_created);
    assert_eq!(summary.mode, Some(WriteMode::Append));
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.updated_range.as_deref(), Some("'cust7'!A11:E13"));

    let calls = sheet.calls();
    assert!(!calls.iter().any(|call| matches!(call, RecordedCall::BatchUpdate { .. })));
    let appends: Vec<_> = calls
        .iter()
        .filter_map(|call| match call {
            RecordedCall::AppendValues { range, rows } => Some((range.clone(), rows.len())),
            _ => None,
        })
        .collect();
    assert_eq!(appends, vec![("'cust7'".to_string(), 3)]);

    let rows = sheet.rows("cust7");
    assert_eq!(rows.len(), 13);
    let ids: Vec<String> = rows[10..].iter().map(|row| row[0].to_string()).collect();
    assert_eq!(ids, vec!["o1", "o2", "o3"]);
}

#[tokio::test]
async fn forbidden_spreadsheet_stops_after_access_check() {
    let (service, sheet, provider) = ledger(InMemorySpreadsheet::new(SPREADSHEET_ID));
    sheet.fail_next(
        Operation::GetMetadata,
        RemoteError::Status {
            code: 403,
            status: Some("PERMISSION_DENIED".into()),
            message: "The caller does not have permission".into(),
        },
    );

    let err = service
        .submit(&order("o1", "Widget", 1, "1.00", "0.50"), "cust42")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(err.message().contains(SPREADSHEET_ID));
    assert_eq!(sheet.calls().len(), 1);
    assert_eq!(provider.invalidations(), 0);
}

#[tokio::test]
async fn structural_write_precedes_value_write() {
    let (service, sheet, _) = ledger(InMemorySpreadsheet::new(SPREADSHEET_ID));
    service.submit(&order("o1", "Widget", 1, "1.00", "0.50"), "cust1").await.unwrap();

    let kinds: Vec<&str> = sheet
        .calls()
        .iter()
        .map(|call| match call {
            RecordedCall::GetMetadata { .. } => "get",
            RecordedCall::BatchUpdate { .. } => "structural",
            RecordedCall::UpdateValues { .. } => "update",
            RecordedCall::AppendValues { .. } => "append",
        })
        .collect();
    // access check, existence check, structural batch, value write
    assert_eq!(kinds, vec!["get", "get", "structural", "update"]);
}

#[tokio::test]
async fn second_submission_appends_below_header() {
    let (service, sheet, _) = ledger(InMemorySpreadsheet::new(SPREADSHEET_ID));
    service.submit(&order("o1", "Widget", 1, "1.00", "0.50"), "cust5").await.unwrap();
    let summary =
        service.submit(&order("o2", "Widget", 2, "1.00", "0.50"), "cust5").await.unwrap();

    assert_eq!(summary.mode, Some(WriteMode::Append));
    let rows = sheet.rows("cust5");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], header_row());
    assert_eq!(rows[2][0].to_string(), "o2");
}

#[tokio::test]
async fn failed_structural_update_surfaces_operation_failed() {
    let (service, sheet, provider) = ledger(InMemorySpreadsheet::new(SPREADSHEET_ID));
    sheet.fail_next(
        Operation::BatchUpdate,
        RemoteError::Status { code: 500, status: None, message: "internal".into() },
    );

    let err = service
        .submit(&order("o1", "Widget", 1, "1.00", "0.50"), "cust8")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert_eq!(err.message(), "Failed to execute sheet operations");
    assert!(sheet.worksheet_titles().is_empty());
    assert_eq!(provider.invalidations(), 0);
}

#[tokio::test]
async fn concurrent_customers_get_separate_worksheets() {
    let (service, sheet, _) = ledger(InMemorySpreadsheet::new(SPREADSHEET_ID));
    let service = Arc::new(service);

    let tasks = (0..4).map(|n| {
        let service = service.clone();
        async move {
            let target = format!("cust{n}");
            service.submit(&order(&format!("o{n}"), "Widget", 1, "1.00", "0.50"), &target).await
        }
    });
    for result in join_all(tasks).await {
        result.unwrap();
    }

    let mut titles = sheet.worksheet_titles();
    titles.sort();
    assert_eq!(titles, vec!["cust0", "cust1", "cust2", "cust3"]);
    for n in 0..4 {
        assert_eq!(sheet.rows(&format!("cust{n}")).len(), 2);
    }
}
