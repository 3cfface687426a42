//! Job Coordinator Integration Tests
//!
//! Drives submissions through the coordinator against in-memory SQLite with
//! a fake oracle:
//! - record is PENDING when the oracle is called
//! - DONE stores exactly the sections that were present
//! - oracle failures end in ERROR without failing the submission
//! - invalid input creates nothing

use std::sync::Arc;

use saju_intake::services::JobCoordinator;
use saju_intake_core::{IntakeForm, JobStatus, LookupKey, SectionLabel};
use saju_intake_llm::LlmError;

use super::support::{create_test_db, sample_form, FakeOracle, FULL_REPLY};

#[tokio::test]
async fn test_record_is_pending_before_oracle_call() {
    let db = create_test_db();
    let oracle = Arc::new(
        FakeOracle::replying(Ok(FULL_REPLY.to_string()))
            .watching(db.clone(), LookupKey::new("01012345678", "1990-05-01")),
    );
    let coordinator = JobCoordinator::new(db.clone(), oracle.clone());

    let row = coordinator.submit(&sample_form()).await.unwrap();

    assert_eq!(oracle.calls(), 1);
    assert_eq!(oracle.observed(), vec![Some(JobStatus::Pending)]);
    assert_eq!(db.get_record(row).unwrap().unwrap().status, JobStatus::Done);
}

#[tokio::test]
async fn test_stored_labels_for_submission() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string())));
    let coordinator = JobCoordinator::new(db.clone(), oracle);

    let row = coordinator.submit(&sample_form()).await.unwrap();
    let record = db.get_record(row).unwrap().unwrap();

    assert_eq!(record.calendar_type, "양력");
    assert_eq!(record.gender, "남성");
    assert_eq!(record.source, "기타");
    assert_eq!(record.birthdate, "1990-05-01");
}

#[tokio::test]
async fn test_done_record_holds_all_sections() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string())));
    let coordinator = JobCoordinator::new(db.clone(), oracle);

    let row = coordinator.submit(&sample_form()).await.unwrap();
    let record = db.get_record(row).unwrap().unwrap();

    assert_eq!(record.status, JobStatus::Done);
    assert!(record.processed_at.is_some());
    assert_eq!(record.sections.summary, "목(木) 기운이 강한 편입니다.");
    assert_eq!(record.sections.product_keywords, "견과류, 녹차");
    assert_eq!(record.sections.promo, "가볍게 즐겨 보세요.");
    for label in SectionLabel::ALL {
        assert!(!record.sections.get(label).is_empty(), "{} empty", label.title());
    }
}

#[tokio::test]
async fn test_partial_reply_leaves_missing_sections_empty() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Ok(
        "[사주요약]\n내용A\n[건강주의]\n내용B".to_string()
    )));
    let coordinator = JobCoordinator::new(db.clone(), oracle);

    let row = coordinator.submit(&sample_form()).await.unwrap();
    let record = db.get_record(row).unwrap().unwrap();

    assert_eq!(record.status, JobStatus::Done);
    assert_eq!(record.sections.summary, "내용A");
    assert_eq!(record.sections.health, "내용B");
    assert_eq!(record.sections.foods, "");
    assert_eq!(record.sections.avoid, "");
    assert_eq!(record.sections.product_keywords, "");
    assert_eq!(record.sections.promo, "");
}

#[tokio::test]
async fn test_unparseable_reply_is_still_done() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Ok("섹션 없이 답했습니다".to_string())));
    let coordinator = JobCoordinator::new(db.clone(), oracle);

    let row = coordinator.submit(&sample_form()).await.unwrap();
    let record = db.get_record(row).unwrap().unwrap();

    assert_eq!(record.status, JobStatus::Done);
    assert!(record.sections.is_empty());
}

#[tokio::test]
async fn test_oracle_failure_marks_error() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Err(LlmError::ServerError {
        message: "upstream exploded".to_string(),
        status: Some(500),
    })));
    let coordinator = JobCoordinator::new(db.clone(), oracle.clone());

    let row = coordinator.submit(&sample_form()).await.unwrap();
    let record = db.get_record(row).unwrap().unwrap();

    assert_eq!(record.status, JobStatus::Error);
    assert!(record.processed_at.is_some());
    assert!(record.sections.summary.starts_with("AI 처리 중 오류: "));
    assert!(record.sections.summary.contains("upstream exploded"));
    for label in &SectionLabel::ALL[1..] {
        assert_eq!(record.sections.get(*label), "");
    }
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn test_missing_fields_create_no_record() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string())));
    let coordinator = JobCoordinator::new(db.clone(), oracle.clone());

    let form = IntakeForm {
        name: "  ".to_string(),
        calendar_type: String::new(),
        ..sample_form()
    };
    let err = coordinator.submit(&form).await.unwrap_err();

    assert_eq!(err.to_string(), "missing_required_fields");
    assert_eq!(db.count_records().unwrap(), 0);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_prompt_uses_normalized_fields() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string())));
    let coordinator = JobCoordinator::new(db.clone(), oracle.clone());

    let form = IntakeForm {
        birthdate: "1990/5/1".to_string(),
        phone: "010-1234-5678".to_string(),
        ..sample_form()
    };
    coordinator.submit(&form).await.unwrap();

    let prompt = &oracle.prompts()[0];
    assert!(prompt.contains("- 생년월일: 1990-05-01"));
    assert!(prompt.contains("- 출생시간: (미입력)"));
    assert!(prompt.contains("- 메모: (없음)"));
}

#[tokio::test]
async fn test_each_submission_gets_its_own_row() {
    let db = create_test_db();
    let oracle = Arc::new(FakeOracle::replying(Ok(FULL_REPLY.to_string())));
    let coordinator = JobCoordinator::new(db.clone(), oracle.clone());

    let first = coordinator.submit(&sample_form()).await.unwrap();
    let second = coordinator.submit(&sample_form()).await.unwrap();

    assert!(second > first);
    assert_eq!(db.count_records().unwrap(), 2);
    assert_eq!(oracle.calls(), 2);

    let latest = db
        .find_latest_by_key(&LookupKey::new("01012345678", "1990-05-01"))
        .unwrap()
        .unwrap();
    assert_eq!(latest.row_index, second);
}
