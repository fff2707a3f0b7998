use crate::snapshot::{Result, Snapshot, StatsError};
use log::debug;

/// 比较两份快照，返回 `new` 中标识或计数发生变化的行
///
/// 两份快照按行号一一对应，而不是按 IRQ 标识匹配。若两次读取之间
/// 行的顺序发生变化（例如 CPU 热插拔），变化可能被归到错误的行上。
/// 行数不同直接返回 [`StatsError::ShapeMismatch`]。
pub fn diff(old: &Snapshot, new: &Snapshot) -> Result<Snapshot> {
    if old.rows.len() != new.rows.len() {
        return Err(StatsError::ShapeMismatch {
            old: old.rows.len(),
            new: new.rows.len(),
        });
    }

    let rows: Vec<_> = old
        .rows
        .iter()
        .zip(&new.rows)
        .filter(|(lhs, rhs)| lhs.id != rhs.id || lhs.counts != rhs.counts)
        .map(|(_, rhs)| rhs.clone())
        .collect();

    debug!("差异行数: {}/{}", rows.len(), new.rows.len());

    Ok(Snapshot {
        cpu_labels: new.cpu_labels.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse_snapshot;
    use crate::snapshot::tests::SAMPLE;

    #[test]
    fn test_diff_identical_is_empty() {
        let snapshot = parse_snapshot(SAMPLE).unwrap();
        let delta = diff(&snapshot, &snapshot).unwrap();
        assert!(delta.is_empty());
        assert_eq!(delta.cpu_labels, snapshot.cpu_labels);
    }

    #[test]
    fn test_diff_keeps_changed_rows_in_order() {
        let old = parse_snapshot("CPU0 CPU1\n 1: 1 1 a\n 2: 2 2 b\n 3: 3 3 c\n").unwrap();
        let new = parse_snapshot("CPU0 CPU1\n 1: 1 1 a\n 2: 2 5 b\n 3: 9 3 c\n").unwrap();
        let delta = diff(&old, &new).unwrap();
        let ids: Vec<&str> = delta.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(delta.rows[0].counts, vec![2, 5]);
    }

    #[test]
    fn test_diff_reports_id_change() {
        let old = parse_snapshot("CPU0\n 1: 4 a\n 2: 4 b\n").unwrap();
        let new = parse_snapshot("CPU0\n 1: 4 a\n 7: 4 b\n").unwrap();
        let delta = diff(&old, &new).unwrap();
        assert_eq!(delta.rows.len(), 1);
        assert_eq!(delta.rows[0].id, "7");
    }

    #[test]
    fn test_diff_ignores_description_change() {
        let old = parse_snapshot("CPU0\n 1: 4 a\n").unwrap();
        let new = parse_snapshot("CPU0\n 1: 4 renamed\n").unwrap();
        assert!(diff(&old, &new).unwrap().is_empty());
    }

    #[test]
    fn test_diff_global_counter() {
        let old = parse_snapshot("CPU0 CPU1\n 1: 1 1 a\nERR: 0\n").unwrap();
        let new = parse_snapshot("CPU0 CPU1\n 1: 1 1 a\nERR: 2\n").unwrap();
        let delta = diff(&old, &new).unwrap();
        assert_eq!(delta.rows.len(), 1);
        assert!(delta.rows[0].is_global_counter);
        assert_eq!(delta.rows[0].counts, vec![2]);
    }

    #[test]
    fn test_diff_shape_mismatch() {
        let old = parse_snapshot("CPU0\n 1: 4 a\n").unwrap();
        let new = parse_snapshot("CPU0\n 1: 4 a\n 2: 1 b\n").unwrap();
        match diff(&old, &new) {
            Err(StatsError::ShapeMismatch { old, new }) => {
                assert_eq!((old, new), (1, 2));
            }
            other => panic!("应该是 ShapeMismatch 错误: {other:?}"),
        }
    }
}
