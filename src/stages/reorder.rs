// Adjacent-swap reordering with total renumbering

use crate::models::{Stage, StageId};

/// Which neighbour a stage trades places with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Earlier,
    Later,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Earlier => "up",
            Direction::Later => "down",
        }
    }
}

/// Destination index of a move, or None when it would leave `0..len`
pub fn destination(index: usize, len: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Earlier => index.checked_sub(1),
        Direction::Later => index.checked_add(1).filter(|&j| j < len),
    }
}

/// Sort by order value. Stable, so stages sharing an order keep their relative position.
pub fn sort_by_order(stages: &mut [Stage]) {
    stages.sort_by_key(|s| s.order);
}

/// Assign `order = index + 1` to every stage.
/// Returns the id and new order of each stage whose order actually changed.
pub fn renumber(stages: &mut [Stage]) -> Vec<(StageId, u32)> {
    let mut changed = Vec::new();
    for (index, stage) in stages.iter_mut().enumerate() {
        let order = index as u32 + 1;
        if stage.order != order {
            stage.order = order;
            changed.push((stage.id.clone(), order));
        }
    }
    changed
}

/// Swap a stage with its neighbour and renumber the whole list.
///
/// Returns None, leaving `stages` untouched, when the id is unknown or the
/// stage is already at the boundary in that direction.
pub fn move_adjacent(stages: &mut [Stage], id: &str, direction: Direction) -> Option<Vec<(StageId, u32)>> {
    let index = stages.iter().position(|s| s.id == id)?;
    let target = destination(index, stages.len(), direction)?;
    stages.swap(index, target);
    Some(renumber(stages))
}

/// True when order values are exactly 1..=N in list order
pub fn is_dense(stages: &[Stage]) -> bool {
    stages
        .iter()
        .enumerate()
        .all(|(index, s)| s.order == index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: &str, order: u32) -> Stage {
        Stage {
            id: id.to_string(),
            order,
            title: id.to_string(),
            description: String::new(),
            progress_percent: 0,
            priority: Default::default(),
            start_date: None,
            end_date: None,
            status_id: "s".to_string(),
            stage_type_id: "t".to_string(),
        }
    }

    fn ids(stages: &[Stage]) -> Vec<(&str, u32)> {
        stages.iter().map(|s| (s.id.as_str(), s.order)).collect()
    }

    #[test]
    fn test_destination_bounds() {
        assert_eq!(destination(0, 3, Direction::Earlier), None);
        assert_eq!(destination(2, 3, Direction::Later), None);
        assert_eq!(destination(1, 3, Direction::Earlier), Some(0));
        assert_eq!(destination(1, 3, Direction::Later), Some(2));
        assert_eq!(destination(0, 1, Direction::Later), None);
    }

    #[test]
    fn test_move_earlier_swaps_with_previous() {
        let mut stages = vec![stage("a", 1), stage("b", 2), stage("c", 3)];
        let changed = move_adjacent(&mut stages, "b", Direction::Earlier).unwrap();
        assert_eq!(ids(&stages), vec![("b", 1), ("a", 2), ("c", 3)]);
        assert_eq!(changed, vec![("b".to_string(), 1), ("a".to_string(), 2)]);
    }

    #[test]
    fn test_move_later_swaps_with_next() {
        let mut stages = vec![stage("a", 1), stage("b", 2), stage("c", 3)];
        let changed = move_adjacent(&mut stages, "b", Direction::Later).unwrap();
        assert_eq!(ids(&stages), vec![("a", 1), ("c", 2), ("b", 3)]);
        assert_eq!(changed.len(), 2);
    }

    #[test]
    fn test_boundaries_and_unknown_are_noops() {
        let mut stages = vec![stage("a", 1), stage("b", 2)];
        assert!(move_adjacent(&mut stages, "a", Direction::Earlier).is_none());
        assert!(move_adjacent(&mut stages, "b", Direction::Later).is_none());
        assert!(move_adjacent(&mut stages, "x", Direction::Later).is_none());
        assert_eq!(ids(&stages), vec![("a", 1), ("b", 2)]);

        let mut single = vec![stage("a", 1)];
        assert!(move_adjacent(&mut single, "a", Direction::Earlier).is_none());
        assert!(move_adjacent(&mut single, "a", Direction::Later).is_none());

        let mut empty: Vec<Stage> = Vec::new();
        assert!(move_adjacent(&mut empty, "a", Direction::Later).is_none());
    }

    #[test]
    fn test_gaps_and_duplicates_heal() {
        let mut stages = vec![stage("a", 2), stage("b", 2), stage("c", 9), stage("d", 10)];
        sort_by_order(&mut stages);
        let changed = move_adjacent(&mut stages, "d", Direction::Earlier).unwrap();
        assert_eq!(ids(&stages), vec![("a", 1), ("b", 2), ("d", 3), ("c", 4)]);
        assert!(is_dense(&stages));
        // b already had order 2, so it is not part of the persisted changes
        assert!(!changed.iter().any(|(id, _)| id == "b"));
        assert_eq!(changed.len(), 3);
    }

    #[test]
    fn test_permutation_after_many_moves() {
        let mut stages: Vec<Stage> = (1..=6).map(|i| stage(&format!("s{i}"), i)).collect();
        let moves = [
            ("s3", Direction::Earlier),
            ("s1", Direction::Later),
            ("s6", Direction::Later),
            ("s6", Direction::Earlier),
            ("s2", Direction::Earlier),
            ("s4", Direction::Later),
        ];
        for (id, direction) in moves {
            move_adjacent(&mut stages, id, direction);
            let mut orders: Vec<u32> = stages.iter().map(|s| s.order).collect();
            orders.sort_unstable();
            assert_eq!(orders, (1..=6).collect::<Vec<u32>>());
            assert!(is_dense(&stages));
        }
    }
}
