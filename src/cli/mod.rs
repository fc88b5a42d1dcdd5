//! CLI 命令实现

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::*;

use crate::assets::{
    frontmatter, list_entries, resolve_provider, AssetProvider, AssetTree, SourceOptions,
    HAS_EMBEDDED_FILES,
};
use crate::install::{self, CheckStatus, InstallOptions, Tool};
use crate::project::find_project_root_or;

/// 解析安装根目录：`--global` 使用 home，否则 `--dir` 或项目根目录
pub fn install_root(dir: Option<PathBuf>, global: bool) -> Result<PathBuf> {
    if global {
        return dirs::home_dir().context("Could not determine home directory");
    }
    match dir {
        Some(dir) => Ok(dir),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Ok(find_project_root_or(&cwd))
        }
    }
}

/// 显示构建与资源来源信息
pub fn show_info(options: &SourceOptions) -> Result<()> {
    println!("{}", "🔍 Belmont".cyan().bold());
    println!();
    println!("   Version:  {}", env!("APP_VERSION").yellow());
    let embedded = if HAS_EMBEDDED_FILES {
        "yes".green()
    } else {
        "no".yellow()
    };
    println!("   Embedded: {}", embedded);

    match resolve_provider(options) {
        Ok(provider) => {
            println!("   Source:   {}", provider.origin().to_string().cyan());
            for tree in AssetTree::ALL {
                let count = provider.list(tree)?.len();
                println!("   {:<9} {} files", format!("{}:", tree), count);
            }
        }
        Err(e) => {
            println!("   Source:   {}", "unavailable".red());
            println!("   {}", e.to_string().red());
        }
    }

    Ok(())
}

/// 列出 skills / agents
pub fn list_assets(provider: &dyn AssetProvider, tree: Option<AssetTree>) -> Result<()> {
    let trees: Vec<AssetTree> = match tree {
        Some(tree) => vec![tree],
        None => AssetTree::ALL.to_vec(),
    };

    for tree in trees {
        let entries = list_entries(provider, tree)?;
        println!("{}", format!("📦 {} ({})", tree, entries.len()).cyan().bold());
        for entry in &entries {
            match &entry.description {
                Some(desc) => println!("  {} {} - {}", "•".green(), entry.name.yellow(), desc),
                None => println!("  {} {}", "•".green(), entry.name.yellow()),
            }
        }
        println!();
    }

    println!("Source: {}", provider.origin().to_string().cyan());
    Ok(())
}

/// 输出单个资源内容
pub fn show_asset(
    provider: &dyn AssetProvider,
    tree: AssetTree,
    path: &str,
    body_only: bool,
) -> Result<()> {
    if body_only {
        let content = provider.read_to_string(tree, path)?;
        print!("{}", frontmatter::body(&content));
        return Ok(());
    }

    let data = provider.read(tree, path)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&data)
        .and_then(|_| stdout.flush())
        .context("Failed to write to stdout")
}

/// 安装资源
pub fn run_install(
    provider: &dyn AssetProvider,
    root: &Path,
    tools: Vec<Tool>,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    let tool_names: Vec<&str> = tools.iter().map(|t| t.as_str()).collect();
    let header = if dry_run {
        "📋 Install plan (dry run)"
    } else {
        "📥 Installing belmont"
    };
    println!("{}", header.cyan().bold());
    println!("   Root:  {}", root.display().to_string().green());
    println!("   Tools: {}", tool_names.join(", ").yellow());
    println!();

    let report = install::install(
        provider,
        &InstallOptions {
            root: root.to_path_buf(),
            tools,
            force,
            dry_run,
        },
    )?;

    for path in &report.written {
        println!("   {} {}", "+".green(), path);
    }
    for path in &report.removed {
        println!("   {} {}", "-".red(), path);
    }
    for path in &report.skipped {
        println!("   {} {} {}", "!".yellow(), path, "(modified, use --force)".yellow());
    }

    println!();
    println!(
        "{} {} written, {} unchanged, {} skipped, {} removed",
        "✓".green(),
        report.written.len(),
        report.unchanged.len(),
        report.skipped.len(),
        report.removed.len()
    );

    Ok(())
}

/// 检查安装状态，全部最新时返回 true
pub fn run_check(provider: &dyn AssetProvider, root: &Path) -> Result<bool> {
    let entries = install::check(provider, root)?;
    let mut clean = true;

    for entry in &entries {
        let label = match entry.status {
            CheckStatus::UpToDate => continue,
            CheckStatus::Outdated | CheckStatus::NotInstalled => entry.status.as_str().yellow(),
            CheckStatus::Modified => entry.status.as_str().magenta(),
            CheckStatus::Missing | CheckStatus::Orphaned => entry.status.as_str().red(),
        };
        clean = false;
        println!("   {:<24} {}", label, entry.path);
    }

    let up_to_date = entries
        .iter()
        .filter(|e| e.status == CheckStatus::UpToDate)
        .count();

    if clean {
        println!("{} {} files up to date", "✓".green(), up_to_date);
    } else {
        println!();
        println!(
            "{} {}/{} files up to date, run {} to update",
            "✗".red(),
            up_to_date,
            entries.len(),
            "belmont install".cyan()
        );
    }

    Ok(clean)
}

/// 卸载资源
pub fn run_uninstall(root: &Path, force: bool, dry_run: bool) -> Result<()> {
    let report = install::uninstall(root, force, dry_run)?;

    for path in &report.removed {
        println!("   {} {}", "-".red(), path);
    }
    for path in &report.kept {
        println!("   {} {} {}", "!".yellow(), path, "(modified, kept)".yellow());
    }

    println!();
    println!(
        "{} {} removed, {} kept, {} already missing",
        "✓".green(),
        report.removed.len(),
        report.kept.len(),
        report.missing.len()
    );

    Ok(())
}
