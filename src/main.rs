use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use belmont::assets::{resolve_provider, AssetTree, SourceOptions};
use belmont::cli;
use belmont::install::Tool;

/// Belmont CLI
///
/// 将 skills 与 agents 安装到 AI 编码工具的项目目录
#[derive(Parser)]
#[command(name = "belmont")]
#[command(author, version = env!("APP_VERSION"), about)]
#[command(
    long_about = "Installs Belmont skills and agents into AI coding tools.\n\
                  Release builds (--features embed) carry both trees inside the binary; \
                  other builds read them from a source checkout."
)]
struct Cli {
    /// skills/ 与 agents/ 所在的源目录（优先于嵌入资源）
    #[arg(long, global = true, env = "BELMONT_SOURCE", value_name = "DIR")]
    source: Option<PathBuf>,

    /// 日志详细程度（-v info，-vv debug）
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// 安装目标
#[derive(Args)]
struct TargetArgs {
    /// 安装根目录（默认：项目根目录）
    #[arg(short, long, value_name = "DIR", conflicts_with = "global")]
    dir: Option<PathBuf>,

    /// 安装到 home 目录
    #[arg(short, long)]
    global: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 显示版本、嵌入状态与资源来源
    Info,

    /// 列出 skills 与 agents
    List {
        /// 只列出指定资源树：skills, agents
        tree: Option<AssetTree>,
    },

    /// 输出单个资源内容
    Show {
        /// 资源树：skills, agents
        tree: AssetTree,

        /// 资源路径（例如 belmont-plan/SKILL.md）
        path: String,

        /// 去掉 front-matter
        #[arg(long)]
        body: bool,
    },

    /// 安装 skills 与 agents
    Install {
        /// 目标工具：claude, codex, cursor, gemini, all（默认 claude）
        #[arg(short, long = "tool", value_name = "TOOL")]
        tools: Vec<String>,

        #[command(flatten)]
        target: TargetArgs,

        /// 覆盖本地修改过的文件
        #[arg(short, long)]
        force: bool,

        /// 只显示计划，不写入
        #[arg(long)]
        dry_run: bool,
    },

    /// 检查已安装文件是否最新
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// 删除已安装的文件
    Uninstall {
        #[command(flatten)]
        target: TargetArgs,

        /// 同时删除本地修改过的文件
        #[arg(short, long)]
        force: bool,

        /// 只显示计划，不删除
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("belmont={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ═══════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source_options = SourceOptions::with_source(cli.source);

    match cli.command {
        Commands::Info => cli::show_info(&source_options),
        Commands::List { tree } => {
            let provider = resolve_provider(&source_options)?;
            cli::list_assets(provider.as_ref(), tree)
        }
        Commands::Show { tree, path, body } => {
            let provider = resolve_provider(&source_options)?;
            cli::show_asset(provider.as_ref(), tree, &path, body)
        }
        Commands::Install {
            tools,
            target,
            force,
            dry_run,
        } => {
            let tools = Tool::resolve(&tools).map_err(anyhow::Error::msg)?;
            let provider = resolve_provider(&source_options)?;
            let root = cli::install_root(target.dir, target.global)?;
            cli::run_install(provider.as_ref(), &root, tools, force, dry_run)
        }
        Commands::Check { target } => {
            let provider = resolve_provider(&source_options)?;
            let root = cli::install_root(target.dir, target.global)?;
            if !cli::run_check(provider.as_ref(), &root)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Uninstall {
            target,
            force,
            dry_run,
        } => {
            let root = cli::install_root(target.dir, target.global)?;
            cli::run_uninstall(&root, force, dry_run)
        }
    }
}
