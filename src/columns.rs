//! CPU 列选择
//!
//! 列集合由 `--cpus` 范围表达式和 `--non-trivial` 两部分组成，
//! 空集合表示不做裁剪。

use crate::snapshot::{Result, Snapshot, StatsError};
use log::debug;
use std::str::FromStr;

/// 解析后的 `--cpus` 范围表达式，例如 `1-2,4` 对应 `[1, 2, 4]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    indices: Vec<usize>,
}

impl ColumnSpec {
    /// 解析范围表达式；空字符串得到空列表
    pub fn parse(expr: &str) -> Result<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Ok(Self::default());
        }

        let mut indices = Vec::new();
        for part in expr.split(',') {
            let part = part.trim();
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_index(start, expr)?;
                    let end = parse_index(end, expr)?;
                    if start > end {
                        return Err(StatsError::RangeExpression(format!(
                            "{expr}: 区间 {start}-{end} 的起点大于终点"
                        )));
                    }
                    indices.extend(start..=end);
                }
                None => indices.push(parse_index(part, expr)?),
            }
        }

        Ok(Self { indices })
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl FromStr for ColumnSpec {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_index(token: &str, expr: &str) -> Result<usize> {
    let token = token.trim();
    token.parse::<usize>().map_err(|_| {
        StatsError::RangeExpression(format!("{expr}: 无效的 CPU 编号 {token:?}"))
    })
}

/// 计算需要显示的列下标
///
/// 先放入显式指定的列（保持原顺序，不去重），若 `only_active` 为真，
/// 再按列号顺序追加尚未选中、且数字 IRQ 行在该列计数之和非零的列。
pub fn select_columns(snapshot: &Snapshot, spec: &ColumnSpec, only_active: bool) -> Vec<usize> {
    let mut selected = spec.indices().to_vec();

    if only_active {
        for column in 0..snapshot.cpu_count() {
            if selected.contains(&column) {
                continue;
            }
            let sum: u64 = snapshot
                .rows
                .iter()
                .filter(|row| row.is_numeric() && !row.is_global_counter)
                .filter_map(|row| row.counts.get(column))
                .sum();
            if sum != 0 {
                selected.push(column);
            }
        }
    }

    selected
}

/// 按列下标原地裁剪快照的 CPU 标签和各行计数
///
/// 全局计数器行只有一个值，不参与裁剪。
pub fn apply_columns(snapshot: &mut Snapshot, columns: &[usize]) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }

    let cpu_count = snapshot.cpu_count();
    if let Some(bad) = columns.iter().find(|&&c| c >= cpu_count) {
        return Err(StatsError::RangeExpression(format!(
            "CPU 编号 {bad} 超出范围 (共 {cpu_count} 个 CPU)"
        )));
    }

    snapshot.cpu_labels = columns
        .iter()
        .map(|&c| snapshot.cpu_labels[c].clone())
        .collect();
    for row in snapshot.rows.iter_mut().filter(|row| !row.is_global_counter) {
        row.counts = columns.iter().map(|&c| row.counts[c]).collect();
    }

    debug!("保留 CPU 列: {columns:?}");
    Ok(())
}
