use super::*;

fn new_paper(author: i64, title: &str) -> NewPaper {
    NewPaper {
        author_id: UserId(author),
        title: title.to_string(),
        abstract_text: format!("{title} abstract"),
        filename: "paper.pdf".to_string(),
    }
}

#[test]
fn submit_paper_starts_submitted_with_next_id() {
    let mut store = SubmissionStore::seeded();
    let paper = store.submit_paper(new_paper(2, "Graph Kernels"), Utc::now());
    assert_eq!(paper.id, PaperId(3));
    assert_eq!(paper.status, PaperStatus::Submitted);
    assert_eq!(paper.final_score, None);
    assert_eq!(store.all_papers().len(), 3);
}

#[test]
fn submit_paper_uses_max_id_not_count() {
    let mut store = SubmissionStore::with_records(
        vec![Paper {
            id: PaperId(9),
            author_id: UserId(2),
            title: "Gap".to_string(),
            abstract_text: String::new(),
            filename: "gap.pdf".to_string(),
            status: PaperStatus::Submitted,
            final_score: None,
            submitted_at: Utc::now(),
        }],
        Vec::new(),
    );
    let paper = store.submit_paper(new_paper(2, "After gap"), Utc::now());
    assert_eq!(paper.id, PaperId(10));

    let mut empty = SubmissionStore::new();
    assert_eq!(empty.submit_paper(new_paper(2, "First"), Utc::now()).id, PaperId(1));
}

#[test]
fn assign_reviewer_moves_any_status_to_under_review() {
    let mut store = SubmissionStore::seeded();
    assert!(store.assign_reviewer(PaperId(2), UserId(3)));
    assert_eq!(
        store.paper_by_id(PaperId(2)).expect("paper").status,
        PaperStatus::UnderReview
    );

    store.submit_review(PaperId(2), UserId(3), 6, "ok".into(), Utc::now());
    assert!(store.assign_reviewer(PaperId(2), UserId(3)));
    assert_eq!(
        store.paper_by_id(PaperId(2)).expect("paper").status,
        PaperStatus::UnderReview
    );
}

#[test]
fn assign_reviewer_on_unknown_paper_is_noop() {
    let mut store = SubmissionStore::seeded();
    let before = store.all_papers().to_vec();
    assert!(!store.assign_reviewer(PaperId(42), UserId(3)));
    assert_eq!(store.all_papers(), before.as_slice());
}

#[test]
fn submit_review_appends_and_marks_reviewed() {
    let mut store = SubmissionStore::seeded();
    let before = store.reviews_by_paper(PaperId(1)).len();

    let review = store
        .submit_review(PaperId(1), UserId(3), 7, "solid".into(), Utc::now())
        .expect("review");

    assert_eq!(review.id, ReviewId(before as i64 + 1));
    assert_eq!(store.reviews_by_paper(PaperId(1)).len(), before + 1);
    assert_eq!(
        store.paper_by_id(PaperId(1)).expect("paper").status,
        PaperStatus::Reviewed
    );
}

#[test]
fn submit_review_is_additive() {
    let mut store = SubmissionStore::seeded();
    store.submit_review(PaperId(1), UserId(4), 9, "great".into(), Utc::now());
    store.submit_review(PaperId(1), UserId(5), 5, "meh".into(), Utc::now());

    let reviews = store.reviews_by_paper(PaperId(1));
    assert_eq!(reviews.len(), 3);
    assert_eq!(
        reviews.iter().map(|r| r.score).collect::<Vec<_>>(),
        vec![7, 9, 5]
    );
    assert_eq!(
        store.paper_by_id(PaperId(1)).expect("paper").status,
        PaperStatus::Reviewed
    );
}

#[test]
fn submit_review_for_unknown_paper_is_noop() {
    let mut store = SubmissionStore::seeded();
    assert!(store
        .submit_review(PaperId(99), UserId(3), 5, String::new(), Utc::now())
        .is_none());
    assert!(store.reviews_by_paper(PaperId(99)).is_empty());
    assert_eq!(store.reviews_by_paper(PaperId(1)).len(), 1);
}

#[test]
fn pending_excludes_papers_already_reviewed_by_that_reviewer() {
    let store = SubmissionStore::seeded();
    assert!(store.papers_pending_for_reviewer(UserId(3)).is_empty());

    let pending = store.papers_pending_for_reviewer(UserId(4));
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, PaperId(1));
}

#[test]
fn pending_only_lists_under_review_papers() {
    let mut store = SubmissionStore::seeded();
    store.assign_reviewer(PaperId(2), UserId(4));
    let ids: Vec<PaperId> = store
        .papers_pending_for_reviewer(UserId(4))
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![PaperId(1), PaperId(2)]);
}

#[test]
fn accepting_unreviewed_paper_snapshots_zero() {
    let mut store = SubmissionStore::seeded();
    let snapshot = store.decide(PaperId(2), Decision::Accept).expect("paper");
    assert_eq!(snapshot, 0.0);

    let paper = store.paper_by_id(PaperId(2)).expect("paper");
    assert_eq!(paper.status, PaperStatus::Accepted);
    assert_eq!(paper.final_score, Some(0.0));
    assert_eq!(decision::average_score(&store.reviews_by_paper(PaperId(2))), None);
}

#[test]
fn rejecting_snapshots_average() {
    let mut store = SubmissionStore::seeded();
    store.submit_review(PaperId(1), UserId(4), 4, String::new(), Utc::now());
    let snapshot = store.decide(PaperId(1), Decision::Reject).expect("paper");
    assert_eq!(snapshot, 5.5);
    assert_eq!(
        store.paper_by_id(PaperId(1)).expect("paper").status,
        PaperStatus::Rejected
    );
    assert_eq!(store.decide(PaperId(77), Decision::Reject), None);
}

#[test]
fn update_status_without_score_clears_snapshot() {
    let mut store = SubmissionStore::seeded();
    store.decide(PaperId(1), Decision::Accept);
    assert!(store.update_paper_status(PaperId(1), PaperStatus::Rejected, None));
    assert_eq!(store.paper_by_id(PaperId(1)).expect("paper").final_score, None);
}

#[test]
fn stats_count_each_status() {
    let mut store = SubmissionStore::seeded();
    store.decide(PaperId(2), Decision::Reject);
    let stats = store.stats();
    assert_eq!(
        stats,
        PaperStats {
            total: 2,
            submitted: 0,
            under_review: 1,
            reviewed: 0,
            accepted: 0,
            rejected: 1,
        }
    );
}

#[test]
fn winners_must_be_accepted_and_are_unique() {
    let mut store = SubmissionStore::seeded();
    assert!(!store.declare_winner(PaperId(2)));

    store.decide(PaperId(1), Decision::Accept);
    assert!(store.declare_winner(PaperId(1)));
    assert!(!store.declare_winner(PaperId(1)));
    assert!(!store.declare_winner(PaperId(50)));

    let winners = store.winners();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].title, "Advances in Machine Learning");
}

#[test]
fn winner_candidates_sorted_by_snapshot() {
    let mut store = SubmissionStore::seeded();
    let third = store.submit_paper(new_paper(2, "Third"), Utc::now());
    store.submit_review(third.id, UserId(3), 9, String::new(), Utc::now());

    store.decide(PaperId(1), Decision::Accept);
    store.decide(PaperId(2), Decision::Accept);
    store.decide(third.id, Decision::Accept);

    let order: Vec<PaperId> = store.winner_candidates().into_iter().map(|p| p.id).collect();
    assert_eq!(order, vec![third.id, PaperId(1), PaperId(2)]);
}

#[test]
fn checked_assign_only_from_submitted() {
    let mut store = SubmissionStore::seeded();
    assert_eq!(store.assign_if_submitted(PaperId(2), UserId(3)), Ok(()));
    assert_eq!(
        store.assign_if_submitted(PaperId(2), UserId(3)),
        Err(TransitionError::Blocked {
            from: PaperStatus::UnderReview,
            to: PaperStatus::UnderReview,
        })
    );
    assert_eq!(
        store.assign_if_submitted(PaperId(8), UserId(3)),
        Err(TransitionError::UnknownPaper(PaperId(8)))
    );
}

#[test]
fn checked_review_refuses_second_review_from_same_reviewer() {
    let mut store = SubmissionStore::seeded();
    store
        .review_if_pending(PaperId(1), UserId(4), 6, "fine".into(), Utc::now())
        .expect("pending for reviewer 4");
    assert_eq!(
        store.review_if_pending(PaperId(1), UserId(4), 9, "again".into(), Utc::now()),
        Err(TransitionError::NotPending)
    );
    assert_eq!(store.reviews_by_paper(PaperId(1)).len(), 2);
}

#[test]
fn late_review_cannot_reopen_decided_paper() {
    let mut store = SubmissionStore::seeded();
    // Reviewers 4 and 5 both see paper 1 pending; 4 submits and the admin
    // accepts before 5 gets there.
    assert_eq!(store.papers_pending_for_reviewer(UserId(5)).len(), 1);
    store
        .review_if_pending(PaperId(1), UserId(4), 8, String::new(), Utc::now())
        .expect("review");
    store
        .decide_if_reviewed(PaperId(1), Decision::Accept)
        .expect("decide");

    assert_eq!(
        store.review_if_pending(PaperId(1), UserId(5), 3, String::new(), Utc::now()),
        Err(TransitionError::NotPending)
    );
    let paper = store.paper_by_id(PaperId(1)).expect("paper");
    assert_eq!(paper.status, PaperStatus::Accepted);
    assert_eq!(paper.final_score, Some(7.5));
}

#[test]
fn checked_decision_requires_reviewed() {
    let mut store = SubmissionStore::seeded();
    assert_eq!(
        store.decide_if_reviewed(PaperId(1), Decision::Reject),
        Err(TransitionError::Blocked {
            from: PaperStatus::UnderReview,
            to: PaperStatus::Rejected,
        })
    );
    assert_eq!(
        store.decide_if_reviewed(PaperId(3), Decision::Accept),
        Err(TransitionError::UnknownPaper(PaperId(3)))
    );

    store.submit_review(PaperId(1), UserId(4), 9, String::new(), Utc::now());
    assert_eq!(store.decide_if_reviewed(PaperId(1), Decision::Accept), Ok(8.0));
    assert!(store
        .decide_if_reviewed(PaperId(1), Decision::Reject)
        .is_err());
}
