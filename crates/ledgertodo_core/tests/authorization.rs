use ledgertodo_core::{
    initialize_counter, open_ledger_in_memory, read_counter, AuthError, CreateItemRequest,
    OwnerId, PerItemStore, SingleRecordStore, StoreError, TodoService, TodoStore,
};
use rusqlite::Connection;

fn setup() -> (Connection, OwnerId, OwnerId) {
    let conn = open_ledger_in_memory().unwrap();
    initialize_counter(&conn).unwrap();
    (conn, OwnerId::new_random(), OwnerId::new_random())
}

fn assert_forbidden(err: StoreError) {
    assert!(matches!(err, StoreError::Auth(AuthError::Forbidden { .. })));
}

fn stranger_mutations_are_rejected_without_state_change<S: TodoStore>(
    service: &TodoService<S>,
    owner: &OwnerId,
    stranger: &OwnerId,
) {
    service.initialize(owner).unwrap();
    service.add_item(owner, "mine", "owner data").unwrap();

    assert_forbidden(
        service
            .set_completed(stranger, owner, 0, true)
            .unwrap_err(),
    );
    assert_forbidden(service.remove_item(stranger, owner, 0).unwrap_err());
    assert_forbidden(
        service
            .store()
            .create_item(&CreateItemRequest {
                caller: *stranger,
                owner: *owner,
                record_address: service.store().owner_record_address(owner),
                title: "intruder".to_string(),
                description: "not yours".to_string(),
            })
            .unwrap_err(),
    );

    // Observed state is exactly what the owner wrote.
    let items = service.items(owner).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "mine");
    assert!(!items[0].completed);
    assert_eq!(service.summary(owner).unwrap().unwrap().item_count, 1);
}

#[test]
fn single_record_rejects_stranger_mutations() {
    let (conn, owner, stranger) = setup();
    let service = TodoService::new(SingleRecordStore::new(&conn));
    stranger_mutations_are_rejected_without_state_change(&service, &owner, &stranger);
}

#[test]
fn per_item_rejects_stranger_mutations() {
    let (conn, owner, stranger) = setup();
    let service = TodoService::new(PerItemStore::new(&conn));
    stranger_mutations_are_rejected_without_state_change(&service, &owner, &stranger);
}

#[test]
fn initializing_a_record_for_someone_else_is_forbidden() {
    let (conn, owner, stranger) = setup();
    let store = SingleRecordStore::new(&conn);

    let err = store
        .initialize_record(&ledgertodo_core::InitializeRecordRequest {
            caller: stranger,
            owner,
            record_address: store.owner_record_address(&owner),
        })
        .unwrap_err();
    assert_forbidden(err);
    assert!(TodoService::new(store).summary(&owner).unwrap().is_none());
}

#[test]
fn failures_on_one_owner_never_leak_into_another() {
    let (conn, user_a, user_b) = setup();
    let service = TodoService::new(PerItemStore::new(&conn));
    service.initialize(&user_a).unwrap();
    service.initialize(&user_b).unwrap();

    service.add_item(&user_a, "a0", "owned by a").unwrap();
    service.add_item(&user_b, "b0", "owned by b").unwrap();

    assert_forbidden(service.remove_item(&user_a, &user_b, 0).unwrap_err());
    let missing = service.set_completed(&user_a, &user_a, 9, true).unwrap_err();
    assert!(matches!(missing, StoreError::ItemNotFound { id: 9 }));

    let b_items = service.items(&user_b).unwrap();
    assert_eq!(b_items.len(), 1);
    assert_eq!(b_items[0].title, "b0");
    assert_eq!(service.summary(&user_b).unwrap().unwrap().item_count, 1);
    assert_eq!(read_counter(&conn).unwrap().unwrap().total_items, 2);
}
