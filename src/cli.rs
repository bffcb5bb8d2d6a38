// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn today_arg() -> Arg {
    Arg::new("today")
        .long("today")
        .value_name("YYYY-MM-DD")
        .help("Evaluate as of this date instead of the local date")
}

fn transaction_fields(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("amount").long("amount").required(required),
        Arg::new("category")
            .long("category")
            .required(required)
            .help("Label (e.g. 三餐) or slug (e.g. meals)"),
        Arg::new("date")
            .long("date")
            .required(required)
            .value_name("YYYY-MM-DD"),
        Arg::new("type")
            .long("type")
            .value_name("expense|income"),
        Arg::new("note").long("note"),
    ]
}

fn recurring_fields(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("amount").long("amount").required(required),
        Arg::new("category").long("category").required(required),
        Arg::new("day")
            .long("day")
            .required(required)
            .value_parser(clap::value_parser!(u32))
            .help("Day of month the payment falls due (1-31)"),
        Arg::new("type")
            .long("type")
            .value_name("expense|income"),
        Arg::new("note").long("note"),
        Arg::new("inactive")
            .long("inactive")
            .action(ArgAction::SetTrue)
            .conflicts_with("active"),
        Arg::new("active").long("active").action(ArgAction::SetTrue),
        Arg::new("periods")
            .long("periods")
            .value_parser(clap::value_parser!(u32))
            .help("Total installment count"),
        Arg::new("start")
            .long("start")
            .value_name("YYYY-MM-DD")
            .help("First installment date"),
        Arg::new("total")
            .long("total")
            .help("Total amount of the installment plan"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Expense and income tracking over a spreadsheet-backed store")
        .version(crate_version!())
        .arg(
            Arg::new("api_url")
                .long("api-url")
                .global(true)
                .help("Store web-app URL (overrides config and TALLYBOOK_API_URL)"),
        )
        .subcommand(
            Command::new("summary")
                .about("This month's and this week's spending")
                .arg(
                    Arg::new("period")
                        .long("period")
                        .value_parser(["month", "week"])
                        .default_value("month"),
                )
                .arg(today_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("list")
                        .about("One month of transactions grouped by day")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(today_arg())
                        .args(json_args()),
                )
                .subcommand(Command::new("months").about("Months that have transactions"))
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .args(transaction_fields(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change a transaction; omitted fields keep their value")
                        .arg(Arg::new("id").long("id").required(true))
                        .args(transaction_fields(false)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Recurring items and installment plans")
                .subcommand(
                    Command::new("list")
                        .arg(today_arg())
                        .args(json_args()),
                )
                .subcommand(Command::new("add").args(recurring_fields(true)))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .args(recurring_fields(false))
                        .arg(
                            Arg::new("no_plan")
                                .long("no-plan")
                                .action(ArgAction::SetTrue)
                                .conflicts_with_all(["periods", "start", "total"])
                                .help("Turn an installment plan back into an ongoing item"),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("export")
                .about("Write the transaction snapshot to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(Command::new("doctor").about("Report stored rows that cannot be used"))
}
