//! CSV projection of the timesheet listing.
//!
//! Presentation only: the export walks an already-fetched listing and never
//! touches the store.

use crate::dto::timesheets::TimesheetView;

const HEADER: &str =
    "id,coach_id,status,total_hours,hourly_rate,total_amount,approved_by,rejection_reason";

/// Render the caller-visible timesheet listing as CSV.
pub fn timesheets_to_csv(sheets: &[TimesheetView]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for sheet in sheets {
        let row = [
            sheet.id.to_string(),
            sheet.coach_id.to_string(),
            status_token(sheet),
            format!("{:.2}", sheet.total_hours),
            cents_to_decimal(sheet.hourly_rate_cents),
            cents_to_decimal(sheet.total_amount_cents),
            sheet
                .approved_by
                .map(|id| id.to_string())
                .unwrap_or_default(),
            sheet.rejection_reason.clone().unwrap_or_default(),
        ];
        let quoted: Vec<String> = row.iter().map(|field| quote_field(field)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }

    out
}

/// Wire token of the status (`UNDER_REVIEW`, not `UnderReview`).
fn status_token(sheet: &TimesheetView) -> String {
    serde_json::to_string(&sheet.status)
        .unwrap_or_default()
        .trim_matches('"')
        .to_string()
}

/// Money formatting: cents to a plain decimal with two places.
fn cents_to_decimal(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Quote a field when it carries a comma, quote, or line break.
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::state::timesheet_machine::TimesheetStatus;

    fn sheet(status: TimesheetStatus, reason: Option<&str>) -> TimesheetView {
        TimesheetView {
            id: Uuid::nil(),
            coach_id: Uuid::nil(),
            status,
            total_hours: 2.5,
            hourly_rate_cents: 2500,
            total_amount_cents: 6250,
            linked_session_id: None,
            description: None,
            attachments: Vec::new(),
            approved_by: None,
            approved_at: None,
            paid_at: None,
            rejection_reason: reason.map(String::from),
            dispute_reason: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn header_plus_one_row() {
        let csv = timesheets_to_csv(&[sheet(TimesheetStatus::Draft, None)]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(HEADER));
        let row = lines.next().unwrap();
        assert!(row.contains("DRAFT"));
        assert!(row.contains("2.50"));
        assert!(row.contains("25.00"));
        assert!(row.contains("62.50"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        let csv = timesheets_to_csv(&[sheet(
            TimesheetStatus::Rejected,
            Some("missing receipts, and the \"session\" link"),
        )]);
        assert!(csv.contains("\"missing receipts, and the \"\"session\"\" link\""));
    }

    #[test]
    fn status_uses_wire_tokens() {
        let csv = timesheets_to_csv(&[sheet(TimesheetStatus::UnderReview, None)]);
        assert!(csv.contains("UNDER_REVIEW"));
    }

    #[test]
    fn empty_listing_is_header_only() {
        assert_eq!(timesheets_to_csv(&[]), format!("{HEADER}\n"));
    }
}
