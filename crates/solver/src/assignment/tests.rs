use super::*;

fn item(index: usize) -> Item {
    Item::from_index(index)
}

#[test]
fn assign_rejects_invalid_requests() {
    let mut assignment = Assignment::new(3);
    assert_eq!(assignment.assign(item(3), Value::In), Err(AssignmentError::InvalidItem));
    assert_eq!(assignment.assign(item(0), Value::Free), Err(AssignmentError::FreeValue));
    assert_eq!(assignment.assign(item(0), Value::In), Ok(()));
    assert_eq!(assignment.assign(item(0), Value::In), Err(AssignmentError::AlreadyAssigned));
    assert_eq!(
        assignment.assign(item(0), Value::Out),
        Err(AssignmentError::ConflictingAssignment)
    );
    assert_eq!(assignment.get(item(0)), Value::In);
}

#[test]
fn pop_to_level_restores_values_and_cells() {
    let mut assignment = Assignment::new(4);
    let cells = assignment.alloc_cells(2, 7);
    let root = assignment.bump_decision_level();
    assignment.assign(item(1), Value::In).unwrap();
    assignment.set_cell(cells.get(0), 3);
    let inner = assignment.bump_decision_level();
    assignment.assign(item(2), Value::Out).unwrap();
    assignment.set_cell(cells.get(0), 1);
    assignment.set_cell(cells.get(1), 9);
    assert_eq!(assignment.current_decision_level(), 2);

    assignment.pop_to_level(inner);
    assert_eq!(assignment.current_decision_level(), 1);
    assert_eq!(assignment.get(item(2)), Value::Free);
    assert_eq!(assignment.get(item(1)), Value::In);
    assert_eq!(assignment.cell(cells.get(0)), 3);
    assert_eq!(assignment.cell(cells.get(1)), 7);

    assignment.pop_to_level(root);
    assert_eq!(assignment.current_decision_level(), 0);
    assert!(assignment.values().items_with(Value::Free).eq((0..4).map(item)));
    assert!(cells.iter().all(|cell| assignment.cell(cell) == 7));
    assert_eq!(assignment.trail_len(), 0);
}

#[test]
fn unchanged_cells_are_not_recorded() {
    let mut assignment = Assignment::new(1);
    let cell = assignment.alloc_cell(5);
    let _level = assignment.bump_decision_level();
    assignment.set_cell(cell, 5);
    assert_eq!(assignment.trail_len(), 0);
    assignment.set_cell(cell, 6);
    assignment.set_cell(cell, 5);
    assert_eq!(assignment.trail_len(), 2);
}

#[test]
fn included_tracks_in_items() {
    let mut assignment = Assignment::new(5);
    assignment.assign(item(4), Value::In).unwrap();
    assignment.assign(item(0), Value::Out).unwrap();
    assignment.assign(item(2), Value::In).unwrap();
    assert_eq!(
        assignment.included().iter_ones().collect::<Vec<_>>(),
        [item(2), item(4)]
    );
    assert_eq!(assignment.values().assigned(), [item(4), item(0), item(2)]);
    assert!(!assignment.values().is_complete());
}
