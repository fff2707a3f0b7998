use crate::columns::{ColumnSpec, apply_columns, select_columns};
use crate::delta::diff;
use crate::render::{TableOptions, render_table};
use crate::snapshot::{InterruptSource, Result, Snapshot, StatsError};
use log::{debug, info};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// 终端宽度无法获取时使用的分隔线宽度
const FALLBACK_TERMINAL_WIDTH: usize = 80;

/// 等待期间检查取消标志的间隔
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// 运行配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 两次采样之间的间隔
    pub interval: Duration,
    /// 只显示一次当前统计，不做差分
    pub show: bool,
    /// 显示计数全为零的行
    pub zero: bool,
    /// 显示中断描述
    pub desc: bool,
    /// 去掉没有任何数字 IRQ 计数的 CPU 列
    pub non_trivial: bool,
    /// 显式指定的 CPU 列
    pub cpus: ColumnSpec,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            show: false,
            zero: false,
            desc: false,
            non_trivial: false,
            cpus: ColumnSpec::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            show_zero: self.zero,
            show_description: self.desc,
        }
    }
}

/// 选择列后输出表格
pub fn print_rows<W: Write>(out: &mut W, mut snapshot: Snapshot, config: &Config) -> Result<()> {
    let columns = select_columns(&snapshot, &config.cpus, config.non_trivial);
    apply_columns(&mut snapshot, &columns)?;
    render_table(out, &snapshot, config.table_options())
}

/// 当前终端的列数
pub fn terminal_width() -> usize {
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => columns as usize,
        _ => FALLBACK_TERMINAL_WIDTH,
    }
}

/// 中断统计采样循环
pub struct Monitor<S: InterruptSource> {
    source: S,
    config: Config,
    running: Arc<AtomicBool>,
}

impl<S: InterruptSource> Monitor<S> {
    /// 创建新的采样循环实例
    #[inline]
    pub fn new(source: S, config: Config) -> Self {
        Self {
            source,
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// 取消标志，置为 `false` 后循环在下一次等待结束时退出
    #[inline]
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// 按配置运行：显示模式输出一次，监视模式循环直到被取消
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.config.show {
            return self.show(out);
        }
        self.watch(out, terminal_width)
    }

    /// 显示模式：读取一次并直接输出
    pub fn show<W: Write>(&self, out: &mut W) -> Result<()> {
        // 读取一份快照直接输出，不做差分
        let snapshot = self.source.snapshot()?;
        print_rows(out, snapshot, &self.config)?;
        out.flush().map_err(StatsError::Output)
    }

    /// 监视模式：采样、等待、再采样、输出差异，直到取消
    pub fn watch<W: Write>(&self, out: &mut W, width: impl Fn() -> usize) -> Result<()> {
        info!("开始监视，间隔 {:?}", self.config.interval);

        let mut cycles: u64 = 0;
        while self.running.load(Ordering::SeqCst) {
            // 每轮重新读取两端的快照
            let before = self.source.snapshot()?;
            if !self.pause() {
                break;
            }
            let after = self.source.snapshot()?;

            // 只输出发生变化的行
            print_rows(out, diff(&before, &after)?, &self.config)?;

            // 分隔线占满当前终端宽度
            writeln!(out, "{}", "=".repeat(width())).map_err(StatsError::Output)?;
            out.flush().map_err(StatsError::Output)?;

            cycles += 1;
            debug!("第 {cycles} 轮采样完成");
        }

        info!("监视结束，共 {cycles} 轮");
        Ok(())
    }

    /// 分段等待一个采样间隔，期间被取消则返回 `false`
    fn pause(&self) -> bool {
        // 间隔过大无法表示截止时间时，一直等到被取消
        let deadline = Instant::now().checked_add(self.config.interval);
        loop {
            if !self.running.load(Ordering::SeqCst) {
                return false;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return true;
                    }
                    SLEEP_SLICE.min(deadline - now)
                }
                None => SLEEP_SLICE,
            };
            std::thread::sleep(slice);
        }
    }
}
