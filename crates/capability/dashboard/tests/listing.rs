mod common;

use common::{chief, fixture, hostel_warden, student};
use domain::{IssueType, Scope};
use hostel_dashboard::{DashboardService, IssueFilter, NOTICE_BOARD_LIMIT, StatusFilter};
use serde_json::json;

fn filter(status: Option<StatusFilter>, issue_type: Option<IssueType>, limit: usize) -> IssueFilter {
    IssueFilter {
        status,
        issue_type,
        limit,
    }
}

#[test]
fn status_filter_accepts_aliases() {
    assert_eq!(StatusFilter::parse("Pending"), Some(StatusFilter::Pending));
    assert_eq!(StatusFilter::parse("open"), Some(StatusFilter::Pending));
    assert_eq!(StatusFilter::parse("resolved"), Some(StatusFilter::Solved));
    assert_eq!(StatusFilter::parse("closed"), None);
}

#[tokio::test]
async fn count_is_taken_before_limit() {
    let service = DashboardService::new(fixture());
    let identity = hostel_warden().with_scope(Scope::hostel("H1"));
    let list = service
        .list_issues(&identity, filter(Some(StatusFilter::Pending), None, 2))
        .await
        .expect("list");
    assert_eq!(list.count, 3);
    let ids: Vec<&str> = list.issues.iter().map(|issue| issue.id.as_str()).collect();
    assert_eq!(ids, vec!["iss-5", "iss-3"]);
}

#[tokio::test]
async fn type_filter_narrows_results() {
    let service = DashboardService::new(fixture());
    let list = service
        .list_issues(&chief(), filter(None, Some(IssueType::Complaint), 100))
        .await
        .expect("list");
    let ids: Vec<&str> = list.issues.iter().map(|issue| issue.id.as_str()).collect();
    assert_eq!(ids, vec!["iss-2", "iss-4"]);
    assert_eq!(list.count, 2);
}

#[tokio::test]
async fn student_lists_only_own_issues() {
    let service = DashboardService::new(fixture());
    let list = service
        .list_issues(&student("stu-1", "asha@hostel.test"), filter(None, None, 100))
        .await
        .expect("list");
    let ids: Vec<&str> = list.issues.iter().map(|issue| issue.id.as_str()).collect();
    assert_eq!(ids, vec!["iss-5", "iss-1"]);

    let empty = service
        .list_issues(&student("nobody", ""), filter(None, None, 100))
        .await
        .expect("list");
    assert_eq!(empty.count, 0);
}

#[tokio::test]
async fn notice_board_shows_open_maintenance_only() {
    let service = DashboardService::new(fixture());
    let board = service.notice_board().await.expect("notice board");
    let ids: Vec<&str> = board.iter().map(|issue| issue.id.as_str()).collect();
    assert_eq!(ids, vec!["iss-5", "iss-3", "iss-1"]);
    assert!(
        board
            .iter()
            .all(|issue| issue.issue_type == IssueType::Maintenance && !issue.solved)
    );
}

#[tokio::test]
async fn notice_board_is_capped() {
    let store = fixture();
    let issues: Vec<_> = (0..60)
        .map(|n| {
            json!({
                "id": format!("bulk-{n}"),
                "type": "maintenance",
                "category": "cleaning",
                "message": "Corridor needs sweeping",
                "timestampUtc": 1_700_000_000_000_i64 + n
            })
        })
        .collect();
    store.insert(
        "students",
        "stu-bulk",
        json!({ "name": "Bulk", "hostelId": "H1", "floorId": "H1-F2", "issues": issues }),
    );
    let service = DashboardService::new(store);
    let board = service.notice_board().await.expect("notice board");
    assert_eq!(board.len(), NOTICE_BOARD_LIMIT);
    assert_eq!(board[0].id, "iss-5");
}
