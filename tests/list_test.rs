use postree::{Error, InvalidPosition, ListPosition, PositionalList};
use proptest::prelude::*;
use rstest::{fixture, rstest};

fn stale<T>() -> Result<T, Error> {
    Err(Error::InvalidPosition(InvalidPosition::Stale))
}

fn collect<E: Clone>(list: &PositionalList<E>) -> Vec<E> {
    list.iter().cloned().collect()
}

#[fixture]
fn abc() -> (PositionalList<char>, [ListPosition; 3]) {
    let mut list = PositionalList::new();
    let a = list.add_last('a');
    let b = list.add_last('b');
    let c = list.add_last('c');
    (list, [a, b, c])
}

#[test]
fn add_and_remove_scenario() {
    let mut list = PositionalList::new();
    let p1 = list.add_last(1);
    let p2 = list.add_last(2);
    let p0 = list.add_first(0);

    assert_eq!(collect(&list), [0, 1, 2]);
    assert_eq!(list.len(), 3);
    assert_eq!(list.first(), Some(p0));
    assert_eq!(list.last(), Some(p2));

    assert_eq!(list.remove(p1), Ok(1));
    assert_eq!(collect(&list), [0, 2]);
    assert_eq!(list.len(), 2);
    assert_eq!(list.before(p1), stale());
}

#[rstest]
fn boundaries_have_no_neighbours(abc: (PositionalList<char>, [ListPosition; 3])) {
    let (list, [a, b, c]) = abc;

    assert_eq!(list.before(a), Ok(None));
    assert_eq!(list.after(c), Ok(None));
    assert_eq!(list.after(a), Ok(Some(b)));
    assert_eq!(list.before(c), Ok(Some(b)));
}

#[rstest]
#[case::front(0)]
#[case::middle(1)]
#[case::back(2)]
fn add_before_splices_next_to_position(
    abc: (PositionalList<char>, [ListPosition; 3]),
    #[case] at: usize,
) {
    let (mut list, positions) = abc;
    let p = positions[at];
    let prev = list.before(p).unwrap();

    let new = list.add_before(p, 'x').unwrap();

    assert_eq!(list.before(new), Ok(prev));
    assert_eq!(list.after(new), Ok(Some(p)));
    assert_eq!(list.len(), 4);
}

#[rstest]
#[case::front(0)]
#[case::middle(1)]
#[case::back(2)]
fn add_after_splices_next_to_position(
    abc: (PositionalList<char>, [ListPosition; 3]),
    #[case] at: usize,
) {
    let (mut list, positions) = abc;
    let p = positions[at];
    let next = list.after(p).unwrap();

    let new = list.add_after(p, 'x').unwrap();

    assert_eq!(list.after(new), Ok(next));
    assert_eq!(list.before(new), Ok(Some(p)));
    assert_eq!(list.len(), 4);
}

#[rstest]
fn set_returns_previous_element(abc: (PositionalList<char>, [ListPosition; 3])) {
    let (mut list, [a, b, c]) = abc;

    assert_eq!(list.set(b, 'x'), Ok('b'));
    assert_eq!(collect(&list), ['a', 'x', 'c']);
    assert_eq!(list.set(b, 'b'), Ok('x'));
    assert_eq!(collect(&list), ['a', 'b', 'c']);
    assert_eq!(list.after(a), Ok(Some(b)));
    assert_eq!(list.before(c), Ok(Some(b)));
}

#[rstest]
fn removed_position_fails_everywhere(abc: (PositionalList<char>, [ListPosition; 3])) {
    let (mut list, [_, b, _]) = abc;
    list.remove(b).unwrap();

    assert_eq!(list.get(b), stale());
    assert_eq!(list.before(b), stale());
    assert_eq!(list.after(b), stale());
    assert_eq!(list.add_before(b, 'x'), stale());
    assert_eq!(list.add_after(b, 'x'), stale());
    assert_eq!(list.set(b, 'x'), stale());
    assert_eq!(list.remove(b), stale());
    assert!(!list.contains(b));
    assert_eq!(collect(&list), ['a', 'c']);
}

#[rstest]
fn positions_of_other_lists_are_rejected(abc: (PositionalList<char>, [ListPosition; 3])) {
    let (list, [a, ..]) = abc;
    let mut other = PositionalList::new();
    other.add_last('a');

    let foreign = Error::InvalidPosition(InvalidPosition::Foreign);
    assert_eq!(other.get(a), Err(foreign));
    assert_eq!(other.after(a), Err(foreign));
    assert_eq!(other.remove(a), Err(foreign));
    assert_eq!(other.len(), 1);
    assert_eq!(list.get(a), Ok(&'a'));
}

#[rstest]
fn positions_restart_on_every_call(abc: (PositionalList<char>, [ListPosition; 3])) {
    let (list, positions) = abc;

    assert!(list.positions().eq(positions));
    assert!(list.positions().eq(positions));
    assert_eq!(list.positions().len(), 3);
}

#[rstest]
fn exhausted_positions_report_no_such_element(abc: (PositionalList<char>, [ListPosition; 3])) {
    let (list, [a, b, c]) = abc;
    let mut positions = list.positions();

    assert_eq!(positions.try_next(), Ok(a));
    assert_eq!(positions.try_next(), Ok(b));
    assert_eq!(positions.try_next(), Ok(c));
    assert_eq!(positions.try_next(), Err(Error::NoSuchElement));
    assert_eq!(positions.next(), None);
}

#[rstest]
fn elements_follow_positions(abc: (PositionalList<char>, [ListPosition; 3])) {
    let (list, _) = abc;
    let from_positions: Vec<_> = list.positions().map(|p| *list.get(p).unwrap()).collect();
    let elements: Vec<_> = (&list).into_iter().copied().collect();

    assert_eq!(from_positions, elements);
}

#[test]
fn pop_first_drains_from_the_front() {
    let mut list = PositionalList::new();
    list.add_last(1);
    list.add_last(2);

    assert_eq!(list.pop_first(), Some(1));
    assert_eq!(list.pop_first(), Some(2));
    assert_eq!(list.pop_first(), None);
    assert!(list.is_empty());
}

#[test]
fn rendering() {
    let mut list = PositionalList::new();
    list.add_last("x");
    list.add_last("y");

    assert_eq!(list.to_string(), "null x y null");
    assert_eq!(format!("{list:?}"), r#"["x", "y"]"#);
}

#[derive(Debug, Clone)]
enum Op {
    AddFirst(i32),
    AddLast(i32),
    AddBefore(usize, i32),
    AddAfter(usize, i32),
    Set(usize, i32),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::AddFirst),
        any::<i32>().prop_map(Op::AddLast),
        (any::<usize>(), any::<i32>()).prop_map(|(i, e)| Op::AddBefore(i, e)),
        (any::<usize>(), any::<i32>()).prop_map(|(i, e)| Op::AddAfter(i, e)),
        (any::<usize>(), any::<i32>()).prop_map(|(i, e)| Op::Set(i, e)),
        any::<usize>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn behaves_like_a_vec(ops in prop::collection::vec(op(), 0..64)) {
        let mut list = PositionalList::new();
        let mut model: Vec<(ListPosition, i32)> = Vec::new();
        let mut removed: Vec<ListPosition> = Vec::new();

        for op in ops {
            match op {
                Op::AddFirst(e) => model.insert(0, (list.add_first(e), e)),
                Op::AddLast(e) => model.push((list.add_last(e), e)),
                Op::AddBefore(i, e) if !model.is_empty() => {
                    let i = i % model.len();
                    let p = list.add_before(model[i].0, e).unwrap();
                    model.insert(i, (p, e));
                }
                Op::AddAfter(i, e) if !model.is_empty() => {
                    let i = i % model.len();
                    let p = list.add_after(model[i].0, e).unwrap();
                    model.insert(i + 1, (p, e));
                }
                Op::Set(i, e) if !model.is_empty() => {
                    let i = i % model.len();
                    prop_assert_eq!(list.set(model[i].0, e), Ok(model[i].1));
                    model[i].1 = e;
                }
                Op::Remove(i) if !model.is_empty() => {
                    let (p, e) = model.remove(i % model.len());
                    prop_assert_eq!(list.remove(p), Ok(e));
                    removed.push(p);
                }
                _ => {}
            }

            prop_assert_eq!(list.len(), model.len());
            prop_assert_eq!(list.is_empty(), model.is_empty());
            prop_assert_eq!(list.first(), model.first().map(|(p, _)| *p));
            prop_assert_eq!(list.last(), model.last().map(|(p, _)| *p));
        }

        prop_assert!(list.positions().eq(model.iter().map(|(p, _)| *p)));
        prop_assert!(list.iter().eq(model.iter().map(|(_, e)| e)));

        for window in model.windows(2) {
            prop_assert_eq!(list.after(window[0].0), Ok(Some(window[1].0)));
            prop_assert_eq!(list.before(window[1].0), Ok(Some(window[0].0)));
        }

        for p in removed {
            prop_assert!(list.get(p).unwrap_err().is_invalid_position());
        }
    }
}
