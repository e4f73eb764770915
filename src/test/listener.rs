use crate::test::{key, test_listener};
use crate::*;

#[test]
fn test_create_update_destroy_are_classified_by_base_operation() {
    let listener = test_listener("testCQ");

    listener.on_event(&cqevent!(Create, key("k1")));
    listener.on_event(&cqevent!(Update, key("k1")));
    listener.on_event(&cqevent!(Destroy, key("k2")));

    assert_eq!(listener.total_event_count(), 3);
    assert_eq!(listener.create_event_count(), 1);
    assert_eq!(listener.update_event_count(), 1);
    assert_eq!(listener.delete_event_count(), 1);
    assert_eq!(listener.invalidate_event_count(), 0);

    assert!(listener.is_created(&key("k1")));
    assert!(listener.is_updated(&key("k1")));
    assert!(!listener.is_created(&key("k2")));
    assert!(listener.is_destroyed(&key("k2")));
}

#[test]
fn test_update_does_not_count_as_create() {
    let listener = test_listener("testCQ");

    listener.on_event(&cqevent!(Update, key("k1")));

    assert_eq!(listener.update_event_count(), 1);
    assert_eq!(listener.create_event_count(), 0);
    assert!(listener.created_keys().is_empty());
}

#[test]
fn test_invalidate_counts_as_delete_but_not_destroy() {
    let listener = test_listener("testCQ");

    listener.on_event(&cqevent!(Invalidate, key("C")));

    assert_eq!(listener.delete_event_count(), 1);
    assert_eq!(listener.invalidate_event_count(), 1);
    assert_eq!(listener.invalidated_keys(), vec![key("C")]);
    assert!(listener.destroyed_keys().is_empty());
    assert_eq!(listener.query_invalidate_event_count(), 1);
}

#[test]
fn test_base_and_query_operations_are_independent() {
    let listener = test_listener("testCQ");

    // A create of an entry that was already in the result set under another key
    listener.on_event(&cqevent!(Create, Update, key("k1")));
    // An update that takes the entry out of the result set
    listener.on_event(&cqevent!(Update, Destroy, key("k2")));
    // An update that brings the entry into the result set
    listener.on_event(&cqevent!(Update, Create, key("k3")));

    assert_eq!(listener.create_event_count(), 1);
    assert_eq!(listener.update_event_count(), 2);
    assert_eq!(listener.delete_event_count(), 0);

    assert_eq!(listener.query_insert_event_count(), 1);
    assert_eq!(listener.query_update_event_count(), 1);
    assert_eq!(listener.query_delete_event_count(), 1);

    assert!(listener.is_created(&key("k1")));
    assert!(listener.is_updated(&key("k2")));
    assert!(listener.is_updated(&key("k3")));
    assert!(!listener.is_destroyed(&key("k2")));
}

#[test]
fn test_region_events_set_sticky_flags() {
    let listener = test_listener("testCQ");
    assert!(!listener.is_region_cleared());
    assert!(!listener.is_region_invalidated());

    listener.on_event(&CqEvent::region(Operation::RegionClear));
    assert!(listener.is_region_cleared());
    assert!(!listener.is_region_invalidated());

    listener.on_event(&CqEvent::region(Operation::RegionInvalidate));
    listener.on_event(&CqEvent::region(Operation::RegionClear));
    assert!(listener.is_region_cleared());
    assert!(listener.is_region_invalidated());

    // Region events carry no key and land in no base bucket
    assert_eq!(listener.total_event_count(), 3);
    assert!(listener.events().is_empty());
    assert_eq!(listener.create_event_count() + listener.update_event_count() + listener.delete_event_count(), 0);
}

#[test]
fn test_unclassifiable_operations_only_bump_total() {
    let listener = test_listener("testCQ");

    listener.on_event(&cqevent!(Marker, key("m")));
    listener.on_event(&CqEvent::region(Operation::RegionDestroy));

    let stats = listener.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(
        stats,
        ListenerStats {
            total: 2,
            ..ListenerStats::default()
        }
    );
    // The keyed event is still kept in the history
    assert_eq!(listener.keys(), vec![key("m")]);
}

#[test]
fn test_event_without_key_is_counted_but_not_recorded() {
    let listener = test_listener("testCQ");

    listener.on_event(&CqEvent::<String>::new(Operation::Create, Operation::Create, None));

    assert_eq!(listener.total_event_count(), 1);
    assert_eq!(listener.create_event_count(), 1);
    assert_eq!(listener.query_insert_event_count(), 1);
    assert!(listener.created_keys().is_empty());
    assert!(listener.events().is_empty());
}

#[test]
fn test_duplicate_keys_collapse_in_sets_but_not_in_history() {
    let listener = test_listener("testCQ");

    listener.on_event(&cqevent!(Create, key("k1")));
    listener.on_event(&cqevent!(Update, key("k1")));
    listener.on_event(&cqevent!(Update, key("k1")));
    listener.on_event(&cqevent!(Destroy, key("k1")));
    listener.on_event(&cqevent!(Create, key("k1")));

    assert_eq!(listener.created_keys(), vec![key("k1")]);
    assert_eq!(listener.updated_keys(), vec![key("k1")]);
    assert_eq!(listener.destroyed_keys(), vec![key("k1")]);
    assert_eq!(listener.create_event_count(), 2);
    assert_eq!(listener.update_event_count(), 2);

    assert_eq!(listener.keys().len(), 5);
    let operations: Vec<Operation> = listener.events().iter().map(|e| e.base_operation).collect();
    assert_eq!(
        operations,
        vec![
            Operation::Create,
            Operation::Update,
            Operation::Update,
            Operation::Destroy,
            Operation::Create,
        ]
    );
}

#[test]
fn test_errors_are_counted_and_collected() {
    let listener = test_listener("testCQ");

    listener.on_error(&cqerror!("boom"));
    listener.on_error(&cqerror!("boom"));
    listener.on_error(&cqerror!("bang"));

    assert_eq!(listener.error_event_count(), 3);
    assert_eq!(listener.total_event_count(), 3);
    assert!(listener.has_error("boom"));
    assert!(listener.has_error("bang"));
    assert!(!listener.has_error("boo"));

    let mut errors = listener.errors();
    errors.sort();
    assert_eq!(errors, vec!["bang".to_string(), "boom".to_string()]);
}

#[test]
fn test_error_without_description_is_recorded_as_empty() {
    let listener = test_listener("testCQ");

    listener.on_error(&cqevent!(Create, key("k1")));

    assert_eq!(listener.error_event_count(), 1);
    assert!(listener.has_error(""));
    // Errors do not feed the base classification
    assert_eq!(listener.create_event_count(), 0);
    assert!(listener.created_keys().is_empty());
}

#[test]
fn test_connection_transitions_and_close() {
    let listener = test_listener("testCQ");

    listener.on_cq_connected();
    listener.on_cq_disconnected();
    listener.on_cq_connected();

    assert_eq!(listener.cqs_connected_count(), 2);
    assert_eq!(listener.cqs_disconnected_count(), 1);

    assert!(!listener.is_closed());
    listener.close();
    listener.close();
    assert!(listener.is_closed());
}

#[test]
fn test_reset_clears_key_sets_and_close_flag_only() {
    let listener = test_listener("testCQ");

    listener.on_event(&cqevent!(Create, key("k1")));
    listener.on_event(&cqevent!(Update, key("k1")));
    listener.on_event(&cqevent!(Destroy, key("k2")));
    listener.on_event(&cqevent!(Invalidate, key("k3")));
    listener.on_event(&CqEvent::region(Operation::RegionClear));
    listener.on_error(&cqerror!("boom"));
    listener.close();

    let before = listener.stats();
    listener.reset();

    assert!(listener.created_keys().is_empty());
    assert!(listener.updated_keys().is_empty());
    assert!(listener.destroyed_keys().is_empty());
    assert!(listener.invalidated_keys().is_empty());
    assert!(!listener.is_closed());

    // Counters, errors, region flags and history survive
    let after = listener.stats();
    assert_eq!(after.total, before.total);
    assert_eq!(after.creates, 1);
    assert_eq!(after.deletes, 2);
    assert_eq!(after.errors, 1);
    assert!(after.region_cleared);
    assert!(listener.has_error("boom"));
    assert_eq!(listener.events().len(), 4);

    listener.reset();
    let mut after_twice = listener.stats();
    assert_eq!(after_twice, after);
    after_twice.closed = before.closed;
    assert_eq!(after_twice, before);
}

#[test]
fn test_events_are_recorded_after_reset() {
    let listener = test_listener("testCQ");

    listener.on_event(&cqevent!(Create, key("k1")));
    listener.reset();
    listener.on_event(&cqevent!(Create, key("k2")));

    assert_eq!(listener.created_keys(), vec![key("k2")]);
    assert_eq!(listener.create_event_count(), 2);
}

#[test]
fn test_summary_reports_counts_and_keys() {
    let listener = test_listener("portfolioCQ").with_user_name("user1");

    listener.on_event(&cqevent!(Create, key("k1")));
    listener.on_event(&cqevent!(Destroy, key("k2")));

    let summary = listener.summary(false);
    assert!(summary.starts_with("####portfolioCQ (user user1):"));
    assert!(summary.contains("Events Total: 2"));
    assert!(summary.contains("Events Created: 1"));
    assert!(summary.contains("Events Deleted: 1"));
    assert!(!summary.contains("Keys in created set"));

    let detailed = listener.summary(true);
    assert!(detailed.contains("Keys in created set: [\"k1\"]"));
    assert!(detailed.contains("Keys in destroyed set: [\"k2\"]"));
    assert!(detailed.contains("Keys in updated set: []"));

    listener.print_info(true);
}

#[test]
fn test_stats_serialize_to_json() -> std::result::Result<(), serde_json::Error> {
    let listener = test_listener("testCQ");
    listener.on_event(&cqevent!(Create, key("k1")));
    listener.on_cq_connected();

    let json = serde_json::to_value(listener.stats())?;
    assert_eq!(json["total"], 1);
    assert_eq!(json["creates"], 1);
    assert_eq!(json["cqs_connected"], 1);
    assert_eq!(json["closed"], false);

    let restored: ListenerStats = serde_json::from_value(json)?;
    assert_eq!(restored, listener.stats());
    Ok(())
}

#[test]
fn test_listener_accepts_non_string_keys() {
    let listener: CqTestListener<u64> = CqTestListener::with_wait_config("numericCQ", crate::test::fast_config());

    for id in 0..10u64 {
        listener.on_event(&cqevent!(Create, id));
    }
    listener.on_event(&cqevent!(Destroy, 3u64));

    assert_eq!(listener.create_event_count(), 10);
    assert!(listener.is_destroyed(&3));
    assert_eq!(listener.keys(), (0..10u64).chain(std::iter::once(3)).collect::<Vec<_>>());
}

#[test]
fn test_operation_predicates() {
    assert!(Operation::Create.is_create());
    assert!(Operation::Update.is_update());
    assert!(Operation::Destroy.is_destroy());
    assert!(Operation::Invalidate.is_invalidate());
    assert!(Operation::RegionClear.is_clear());
    assert!(Operation::RegionInvalidate.is_region_invalidate());
    assert!(Operation::RegionDestroy.is_region());
    assert!(!Operation::Marker.is_region());
    assert!(!Operation::Marker.is_create());
    assert_eq!(Operation::RegionInvalidate.to_string(), "REGION_INVALIDATE");
}
