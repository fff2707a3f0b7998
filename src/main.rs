use anyhow::{Context, Result};
use clap::Parser;
use intstat::snapshot::DEFAULT_INTERRUPTS_PATH;
use intstat::{ColumnSpec, Config, Monitor, ProcInterrupts};
use log::{debug, info, warn};
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Linux 中断统计
#[derive(Parser, Debug)]
#[command(name = "intstat", author, version, about, long_about = None)]
struct Args {
    /// 采样间隔秒数，支持小数 (默认: 3)
    #[arg(short, long, default_value = "3", value_parser = parse_interval)]
    time: Duration,

    /// 只显示当前统计
    #[arg(short, long)]
    show: bool,

    /// 显示计数为零的行
    #[arg(short, long)]
    zero: bool,

    /// 详细模式
    #[arg(short, long)]
    verbose: bool,

    /// CPU 列，从 0 开始，例如 '1-2,4'
    #[arg(short, long, default_value = "")]
    cpus: String,

    /// 显示中断描述
    #[arg(short, long)]
    desc: bool,

    /// 忽略没有任何中断的 CPU
    #[arg(short, long)]
    non_trivial: bool,

    /// 中断表路径
    #[arg(short, long, default_value = DEFAULT_INTERRUPTS_PATH)]
    file: String,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// 转换为运行配置，`--cpus` 语法错误在采样前报告
    fn config(&self) -> Result<Config> {
        let cpus = ColumnSpec::parse(&self.cpus)
            .with_context(|| format!("无效的 --cpus 参数: {:?}", self.cpus))?;
        Ok(Config {
            interval: self.time,
            show: self.show,
            zero: self.zero,
            desc: self.desc,
            non_trivial: self.non_trivial,
            cpus,
        })
    }
}

fn parse_interval(value: &str) -> std::result::Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("无效的秒数: {value}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("无效的秒数 {value}: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统，-v 时提升到 debug
    let level = if args.verbose { "debug" } else { args.log_level.as_str() };
    init_logger(level);

    // 从命令行参数创建配置，范围表达式在采样前校验
    let config = args.config()?;
    debug!("配置信息: {config:?}");

    // 创建采样循环
    let monitor = Monitor::new(ProcInterrupts::new(&args.file), config);

    // Ctrl-C 清除运行标志，循环在等待结束时退出
    let running = monitor.running();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("收到中断信号，准备退出");
        running.store(false, Ordering::SeqCst);
    }) {
        warn!("设置 Ctrl-C 处理函数失败: {e}");
    }

    // 开始输出
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    monitor
        .run(&mut out)
        .with_context(|| format!("统计 {} 失败", args.file))?;

    Ok(())
}

/// 初始化日志系统
fn init_logger(level: &str) {
    match env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .try_init()
    {
        Ok(_) => debug!("日志系统初始化成功，级别: {level}"),
        Err(e) => eprintln!("日志系统初始化失败: {e}"),
    }
}
