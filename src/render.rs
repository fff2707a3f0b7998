use crate::snapshot::{InterruptRow, Result, Snapshot, StatsError};
use std::io::Write;

/// 表格显示选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// 显示计数全为零的行
    pub show_zero: bool,
    /// 在行尾追加中断描述
    pub show_description: bool,
}

/// 计算列宽：最大计数的位数与最长 CPU 标签中的较大者，再加 1
pub fn column_width(snapshot: &Snapshot) -> usize {
    let digits = snapshot
        .rows
        .iter()
        .flat_map(|row| row.counts.iter())
        .max()
        .map_or(0, |max| max.to_string().len());
    let label = snapshot
        .cpu_labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0);
    digits.max(label) + 1
}

/// 表头行
pub fn format_header(snapshot: &Snapshot, width: usize) -> String {
    let labels: Vec<String> = snapshot
        .cpu_labels
        .iter()
        .map(|label| format!("{label:>width$}"))
        .collect();
    format!("{:3} | {}", "", labels.join(" "))
}

/// 数据行
pub fn format_row(row: &InterruptRow, width: usize, show_description: bool) -> String {
    let counts: Vec<String> = row
        .counts
        .iter()
        .map(|count| format!("{count:<width$}"))
        .collect();
    let mut line = format!("{:>3} | {}", row.id, counts.join(" "));
    if show_description {
        line.push(' ');
        line.push_str(&row.description);
    }
    line
}

/// 将快照渲染为对齐的文本表格
///
/// 没有任何行时只输出空白表头。
pub fn render_table<W: Write>(out: &mut W, snapshot: &Snapshot, options: TableOptions) -> Result<()> {
    if snapshot.is_empty() {
        writeln!(out, "{:3} | ", "").map_err(StatsError::Output)?;
        return Ok(());
    }

    let width = column_width(snapshot);
    writeln!(out, "{}", format_header(snapshot, width)).map_err(StatsError::Output)?;

    for row in &snapshot.rows {
        if row.total() != 0 || options.show_zero {
            writeln!(out, "{}", format_row(row, width, options.show_description))
                .map_err(StatsError::Output)?;
        }
    }

    Ok(())
}
