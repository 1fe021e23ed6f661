use redeem_core::{
    CodeCounts, CodeFilter, CodeId, CodeRecord, CodeRegistry, CodeStatus, FixedClock,
    MemorySlotRepository, MutationOutcome, Rejection, SlotRepository,
};

const CLAIM_TIME: &str = "2026/10/18 09:05:00";

fn registry(repo: &MemorySlotRepository) -> CodeRegistry<&MemorySlotRepository, FixedClock> {
    CodeRegistry::load_with(repo, "redemption-codes", FixedClock(CLAIM_TIME.to_string()))
}

fn add(codes: &mut CodeRegistry<&MemorySlotRepository, FixedClock>, code: &str) -> CodeId {
    codes.add(code, None).unwrap().applied().unwrap()
}

fn assert_claim_invariant(records: &[CodeRecord]) {
    for record in records {
        let claimed = record.status == CodeStatus::Claimed;
        assert_eq!(claimed, record.claimed_by.is_some(), "{record:?}");
        assert_eq!(claimed, record.claimed_at.is_some(), "{record:?}");
    }
}

#[test]
fn add_creates_available_code_without_description() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);

    let id = codes.add("ABC123", Some("")).unwrap().applied().unwrap();

    assert_eq!(codes.len(), 1);
    let record = codes.get(&id).unwrap();
    assert_eq!(record.code, "ABC123");
    assert_eq!(record.status, CodeStatus::Available);
    assert_eq!(record.description, None);
}

#[test]
fn add_trims_code_and_description() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);

    let id = codes
        .add("  GIFT-9  ", Some("  birthday  "))
        .unwrap()
        .applied()
        .unwrap();

    let record = codes.get(&id).unwrap();
    assert_eq!(record.code, "GIFT-9");
    assert_eq!(record.description.as_deref(), Some("birthday"));
}

#[test]
fn blank_code_is_rejected_and_collection_unchanged() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);

    let outcome = codes.add("  ", Some("")).unwrap();

    assert_eq!(outcome, MutationOutcome::Rejected(Rejection::EmptyCode));
    assert!(codes.is_empty());
    assert!(repo.is_empty());
}

#[test]
fn duplicate_code_text_gets_distinct_ids() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);

    let first = add(&mut codes, "SAME");
    let second = add(&mut codes, "SAME");

    assert_ne!(first, second);
    assert_eq!(codes.len(), 2);
}

#[test]
fn claim_sets_claimant_and_timestamp() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let id = add(&mut codes, "ABC123");

    let outcome = codes.claim(&id, Some("Alice")).unwrap();

    assert!(outcome.is_applied());
    let record = codes.get(&id).unwrap();
    assert_eq!(record.status, CodeStatus::Claimed);
    assert_eq!(record.claimed_by.as_deref(), Some("Alice"));
    assert_eq!(record.claimed_at.as_deref(), Some(CLAIM_TIME));
}

#[test]
fn claim_with_system_clock_writes_non_empty_timestamp() {
    let repo = MemorySlotRepository::new();
    let mut codes = CodeRegistry::load(&repo);
    let id = codes.add("ABC123", None).unwrap().applied().unwrap();

    codes.claim(&id, Some("Alice")).unwrap();

    let claimed_at = codes.get(&id).unwrap().claimed_at.clone().unwrap();
    assert!(!claimed_at.is_empty());
}

#[test]
fn claim_missing_id_is_not_found() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    add(&mut codes, "ABC123");
    let before = codes.records().to_vec();

    let missing = CodeId::from("missing");
    let outcome = codes.claim(&missing, Some("Alice")).unwrap();

    assert_eq!(outcome, MutationOutcome::NotFound(missing));
    assert_eq!(codes.records(), before.as_slice());
}

#[test]
fn cancelled_or_empty_claimant_leaves_code_available() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let id = add(&mut codes, "ABC123");

    assert_eq!(
        codes.claim(&id, None).unwrap(),
        MutationOutcome::Rejected(Rejection::Cancelled)
    );
    assert_eq!(
        codes.claim(&id, Some("")).unwrap(),
        MutationOutcome::Rejected(Rejection::EmptyClaimant)
    );
    assert!(codes.get(&id).unwrap().is_available());
    assert!(repo.get("redemption-codes").unwrap().unwrap().contains("available"));
}

#[test]
fn whitespace_claimant_is_stored_verbatim() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let id = add(&mut codes, "ABC123");

    assert!(codes.claim(&id, Some("   ")).unwrap().is_applied());

    let record = codes.get(&id).unwrap();
    assert_eq!(record.status, CodeStatus::Claimed);
    assert_eq!(record.claimed_by.as_deref(), Some("   "));
    drop(codes);

    let reloaded = registry(&repo);
    assert_eq!(reloaded.get(&id).unwrap().claimed_by.as_deref(), Some("   "));
}

#[test]
fn claiming_claimed_code_overwrites_claimant() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let id = add(&mut codes, "ABC123");

    codes.claim(&id, Some("Alice")).unwrap();
    let outcome = codes.claim(&id, Some(" Bob ")).unwrap();

    assert!(outcome.is_applied());
    assert_eq!(codes.get(&id).unwrap().claimed_by.as_deref(), Some(" Bob "));
}

#[test]
fn unclaim_clears_claim_fields_and_is_idempotent() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let id = add(&mut codes, "ABC123");
    codes.claim(&id, Some("Alice")).unwrap();

    codes.unclaim(&id).unwrap();
    let once = codes.records().to_vec();
    let outcome = codes.unclaim(&id).unwrap();

    assert!(outcome.is_applied());
    assert_eq!(codes.records(), once.as_slice());
    let record = codes.get(&id).unwrap();
    assert_eq!(record.status, CodeStatus::Available);
    assert_eq!(record.claimed_by, None);
    assert_eq!(record.claimed_at, None);
}

#[test]
fn unclaim_missing_id_is_not_found() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);

    let missing = CodeId::from("nope");
    assert_eq!(
        codes.unclaim(&missing).unwrap(),
        MutationOutcome::NotFound(missing)
    );
}

#[test]
fn remove_requires_confirmation() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let id = add(&mut codes, "ABC123");

    assert_eq!(
        codes.remove(&id, false).unwrap(),
        MutationOutcome::Rejected(Rejection::Cancelled)
    );
    assert_eq!(codes.len(), 1);

    assert!(codes.remove(&id, true).unwrap().is_applied());
    assert!(codes.get(&id).is_none());
    assert_eq!(
        codes.remove(&id, true).unwrap(),
        MutationOutcome::NotFound(id)
    );
}

#[test]
fn visible_follows_filter_in_insertion_order() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let a = add(&mut codes, "A");
    let b = add(&mut codes, "B");
    let c = add(&mut codes, "C");
    let d = add(&mut codes, "D");
    codes.claim(&b, Some("Alice")).unwrap();
    codes.claim(&d, Some("Bob")).unwrap();

    let ids = |codes: &CodeRegistry<&MemorySlotRepository, FixedClock>| {
        codes
            .visible()
            .map(|record| record.id.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(codes.filter(), CodeFilter::All);
    assert_eq!(ids(&codes), vec![a.clone(), b.clone(), c.clone(), d.clone()]);

    codes.set_filter(CodeFilter::Available);
    assert_eq!(ids(&codes), vec![a.clone(), c.clone()]);
    // Restartable: a second pass yields the same view.
    assert_eq!(ids(&codes), vec![a, c]);

    codes.set_filter(CodeFilter::Claimed);
    assert_eq!(ids(&codes), vec![b, d]);
    assert_eq!(codes.len(), 4);
}

#[test]
fn counts_stay_consistent_through_lifecycle() {
    let repo = MemorySlotRepository::new();
    let mut codes = registry(&repo);
    let check = |codes: &CodeRegistry<&MemorySlotRepository, FixedClock>| {
        let counts = codes.counts();
        assert_eq!(counts.total, counts.available + counts.claimed);
        assert_eq!(counts.total, codes.len());
        assert_claim_invariant(codes.records());
        counts
    };

    assert_eq!(check(&codes), CodeCounts::default());
    let a = add(&mut codes, "A");
    let b = add(&mut codes, "B");
    add(&mut codes, "C");
    codes.claim(&a, Some("Alice")).unwrap();
    codes.claim(&b, Some("Bob")).unwrap();
    assert_eq!(
        check(&codes),
        CodeCounts {
            total: 3,
            available: 1,
            claimed: 2
        }
    );

    codes.unclaim(&b).unwrap();
    codes.remove(&a, true).unwrap();
    assert_eq!(
        check(&codes),
        CodeCounts {
            total: 2,
            available: 2,
            claimed: 0
        }
    );
}
