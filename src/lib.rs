//! Linux 中断统计库
//!
//! 读取 `/proc/interrupts`，按 CPU 列筛选并以对齐表格输出，
//! 监视模式下只输出两次采样之间发生变化的行。

pub mod columns;
pub mod delta;
pub mod monitor;
pub mod render;
pub mod snapshot;

// 重新导出主要的公共类型
pub use columns::{ColumnSpec, apply_columns, select_columns};
pub use delta::diff;
pub use monitor::{Config, Monitor, print_rows};
pub use render::{TableOptions, render_table};
pub use snapshot::{
    InterruptRow, InterruptSource, ProcInterrupts, Snapshot, StatsError, parse_snapshot,
};
