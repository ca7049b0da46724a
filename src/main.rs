//! # sfetool - CrCoFe 合金层错能标定工具
//!
//! 把 ANNNI 模型与 DMLF 层错能对比的后处理脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `calibrate` - ANNNI vs DMLF 比例标定，输出对比 CSV
//! - `plot` - 绘图
//!   - `calibrated`  - ANNNI vs 标定后 DMLF
//!   - `temperature` - DMLF 层错能随温度变化
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (CSV 表格解析)
//!   │     ├── annni/     (ANNNI 模型与标定)
//!   │     ├── plot/      (图表生成)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod annni;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod plot;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
