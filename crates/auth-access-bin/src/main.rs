// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! auth-access binary entry point.

use auth_access_bin::commands;
use auth_access_bin::error::report_error_and_exit;
use auth_access_bin::{init_logging, Cli};

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.effective_log_level(), cli.log_format);

    match commands::execute(&cli) {
        Ok(output) => println!("{output}"),
        Err(err) => report_error_and_exit(err),
    }
}
