//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tweetalytics_engine::ConnectionQuery;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(
    name = "tweetalytics",
    about = "Rank a user's connections and chart their daily activity",
    version
)]
pub struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter, overriding the configured level (e.g. "debug")
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// What to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rank the accounts following a user
    Followers(ConnectionArgs),
    /// Rank the accounts a user follows
    Friends(ConnectionArgs),
    /// Count a user's daily activity
    Activity(ActivityArgs),
}

/// Chart output options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ChartArgs {
    /// Canvas size as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH")]
    pub size: Option<String>,

    /// Draw the chart locally and write it as PNG instead of building a link
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// Shorten the chart link
    #[arg(long)]
    pub shorten: bool,
}

/// Arguments of `followers` and `friends`.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Screen name of the user
    pub id: String,

    /// Ranking metric: followers, friends or statuses
    #[arg(long)]
    pub metric: Option<String>,

    /// Number of accounts to keep
    #[arg(long)]
    pub limit: Option<String>,

    /// Display order: ascending (asc) or descending (desc)
    #[arg(long)]
    pub order: Option<String>,

    /// Which extreme to keep: top or bottom
    #[arg(long, visible_alias = "cat")]
    pub category: Option<String>,

    /// Chart kind: bar, pie or pie3d
    #[arg(long)]
    pub chart: Option<String>,

    #[command(flatten)]
    pub output: ChartArgs,
}

impl ConnectionArgs {
    /// Raw query handed to the query service.
    pub fn query(&self) -> ConnectionQuery {
        ConnectionQuery {
            id: self.id.clone(),
            metric: self.metric.clone(),
            limit: self.limit.clone(),
            order: self.order.clone(),
            category: self.category.clone(),
        }
    }
}

/// Arguments of `activity`.
#[derive(Args, Debug, Clone)]
pub struct ActivityArgs {
    /// Screen name of the user
    pub id: String,

    /// Number of days ending yesterday
    #[arg(long)]
    pub days: Option<u32>,

    #[command(flatten)]
    pub output: ChartArgs,
}
