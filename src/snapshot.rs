use log::debug;
use std::path::PathBuf;

/// 默认的中断表路径
pub const DEFAULT_INTERRUPTS_PATH: &str = "/proc/interrupts";

/// 内核不按 CPU 拆分的全局计数器行，只有一个计数值
pub const GLOBAL_COUNTER_IDS: [&str; 2] = ["MIS", "ERR"];

/// 中断表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptRow {
    pub id: String,
    pub description: String,
    pub counts: Vec<u64>,
    pub is_global_counter: bool,
}

impl InterruptRow {
    /// 行标识是否为纯数字的 IRQ 号
    #[inline]
    pub fn is_numeric(&self) -> bool {
        !self.id.is_empty() && self.id.bytes().all(|b| b.is_ascii_digit())
    }

    /// 本行所有计数之和
    #[inline]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// 某一时刻的完整中断表
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub cpu_labels: Vec<String>,
    pub rows: Vec<InterruptRow>,
}

impl Snapshot {
    /// CPU 列数
    #[inline]
    pub fn cpu_count(&self) -> usize {
        self.cpu_labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 中断统计错误类型
#[derive(Debug)]
pub enum StatsError {
    SourceRead(std::io::Error),
    Parse(String),
    ShapeMismatch { old: usize, new: usize },
    RangeExpression(String),
    Output(std::io::Error),
}

impl From<std::io::Error> for StatsError {
    #[inline]
    fn from(error: std::io::Error) -> Self {
        StatsError::SourceRead(error)
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::SourceRead(e) => write!(f, "读取中断表失败: {e}"),
            StatsError::Parse(s) => write!(f, "解析错误: {s}"),
            StatsError::ShapeMismatch { old, new } => {
                write!(f, "中断表结构在两次读取之间发生变化: {old} 行 -> {new} 行")
            }
            StatsError::RangeExpression(s) => write!(f, "CPU 范围表达式错误: {s}"),
            StatsError::Output(e) => write!(f, "输出错误: {e}"),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::SourceRead(e) | StatsError::Output(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// 中断表数据来源
pub trait InterruptSource {
    /// 一次性读出整张中断表的文本
    fn read_table(&self) -> std::io::Result<String>;

    /// 读取并解析一份快照
    fn snapshot(&self) -> Result<Snapshot> {
        let content = self.read_table()?;
        parse_snapshot(&content)
    }
}

/// 从文件读取中断表，默认为 `/proc/interrupts`
#[derive(Debug, Clone)]
pub struct ProcInterrupts {
    path: PathBuf,
}

impl ProcInterrupts {
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcInterrupts {
    fn default() -> Self {
        Self::new(DEFAULT_INTERRUPTS_PATH)
    }
}

impl InterruptSource for ProcInterrupts {
    fn read_table(&self) -> std::io::Result<String> {
        // 整个文件一次读完，保证所有行来自同一时刻
        std::fs::read_to_string(&self.path)
    }
}

/// 解析中断表文本
pub fn parse_snapshot(content: &str) -> Result<Snapshot> {
    let mut lines = content.lines();

    let header = lines
        .next()
        .ok_or_else(|| StatsError::Parse("中断表为空".to_string()))?;
    let cpu_labels: Vec<String> = header.split_whitespace().map(str::to_string).collect();
    if cpu_labels.is_empty() {
        return Err(StatsError::Parse("表头中没有 CPU 列".to_string()));
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        // 表头为第 1 行
        rows.push(parse_row(line, cpu_labels.len(), index + 2)?);
    }

    debug!("解析中断表: {} 个 CPU, {} 行", cpu_labels.len(), rows.len());

    Ok(Snapshot { cpu_labels, rows })
}

/// 解析单行，`cpu_count` 为表头中的 CPU 列数
fn parse_row(line: &str, cpu_count: usize, line_no: usize) -> Result<InterruptRow> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let id = fields[0].trim_end_matches(':').to_string();
    let is_global_counter = GLOBAL_COUNTER_IDS.contains(&id.as_str());

    let wanted = if is_global_counter { 1 } else { cpu_count };
    if fields.len() < wanted + 1 {
        return Err(StatsError::Parse(format!(
            "第 {line_no} 行 ({id}) 需要 {wanted} 个计数，实际只有 {} 个",
            fields.len() - 1
        )));
    }

    let counts = fields[1..=wanted]
        .iter()
        .map(|field| {
            field.parse::<u64>().map_err(|_| {
                StatsError::Parse(format!("第 {line_no} 行 ({id}) 的计数不是整数: {field:?}"))
            })
        })
        .collect::<Result<Vec<u64>>>()?;

    let description = fields.get(cpu_count + 1..).unwrap_or_default().join(" ");

    Ok(InterruptRow {
        id,
        description,
        counts,
        is_global_counter,
    })
}
