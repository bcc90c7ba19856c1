//! Command execution: wires configuration and adapters into the query
//! service and shapes the JSON report.

use crate::cli::{ActivityArgs, ChartArgs, Command, ConnectionArgs};
use crate::error::CliResult;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tweetalytics_adapters::{
    BitlyShortener, BitmapChartRenderer, ChartUrlRenderer, HttpProviderGateway,
};
use tweetalytics_common::{ConnectionKind, TweetalyticsError};
use tweetalytics_config::{Config, ConfigCache};
use tweetalytics_engine::{
    ActivityReport, ChartRequest, ConnectionReport, LinkShortener, ProviderGateway, QueryService,
    RenderedChart,
};

/// Where the chart ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartOutput {
    /// A chart service link, shortened when requested.
    Url {
        /// The link.
        url: String,
    },
    /// A PNG written to disk.
    Png {
        /// Destination file.
        path: PathBuf,
        /// Encoded size.
        bytes: usize,
    },
}

/// JSON report of `followers` and `friends`.
#[derive(Debug, Serialize)]
pub struct ConnectionOutput {
    /// Query and ranked users.
    #[serde(flatten)]
    pub report: ConnectionReport,
    /// Rendered chart.
    pub chart: ChartOutput,
}

/// JSON report of `activity`.
#[derive(Debug, Serialize)]
pub struct ActivityOutput {
    /// Handle and daily series.
    #[serde(flatten)]
    pub report: ActivityReport,
    /// Rendered chart.
    pub chart: ChartOutput,
}

/// The application: one query service plus chart collaborators.
pub struct App {
    service: QueryService,
    config: Arc<ConfigCache>,
    url_renderer: ChartUrlRenderer,
    bitmap_renderer: BitmapChartRenderer,
}

impl App {
    /// Builds the application against the configured HTTP provider.
    pub fn from_config(config: Config) -> CliResult<Self> {
        let gateway = HttpProviderGateway::new(&config.provider)?;
        Self::with_gateway(Arc::new(gateway), config)
    }

    /// Builds the application against any provider gateway.
    pub fn with_gateway(gateway: Arc<dyn ProviderGateway>, config: Config) -> CliResult<Self> {
        config.validate()?;
        let url_renderer = ChartUrlRenderer::from_config(&config.charts)?;
        let config = Arc::new(ConfigCache::new(config));
        Ok(Self {
            service: QueryService::new(gateway, Arc::clone(&config)),
            config,
            url_renderer,
            bitmap_renderer: BitmapChartRenderer::new(),
        })
    }

    /// Runs one subcommand and returns its JSON report.
    pub async fn run(&self, command: &Command) -> CliResult<serde_json::Value> {
        let value = match command {
            Command::Followers(args) => {
                serde_json::to_value(self.connections(ConnectionKind::Followers, args).await?)?
            }
            Command::Friends(args) => {
                serde_json::to_value(self.connections(ConnectionKind::Friends, args).await?)?
            }
            Command::Activity(args) => serde_json::to_value(self.activity(args).await?)?,
        };
        Ok(value)
    }

    /// Ranks connections and charts them. Chart options are checked
    /// before the provider is contacted.
    pub async fn connections(
        &self,
        kind: ConnectionKind,
        args: &ConnectionArgs,
    ) -> CliResult<ConnectionOutput> {
        let chart_kind = self.service.chart_kind(args.chart.as_deref())?;
        let canvas = self.service.user_canvas(args.output.size.as_deref())?;
        let target = self.chart_target(&args.output)?;

        let report = self.service.connections(kind, &args.query()).await?;
        let request = self.service.user_chart(&report, chart_kind, canvas);
        let chart = self.publish(&request, target).await?;
        Ok(ConnectionOutput { report, chart })
    }

    /// Counts daily activity and charts it. Chart options are checked
    /// before the provider is contacted.
    pub async fn activity(&self, args: &ActivityArgs) -> CliResult<ActivityOutput> {
        let canvas = self.service.activity_canvas(args.output.size.as_deref())?;
        let target = self.chart_target(&args.output)?;

        let report = self.service.activity(&args.id, args.days).await?;
        let request = self.service.activity_chart(&report, canvas);
        let chart = self.publish(&request, target).await?;
        Ok(ActivityOutput { report, chart })
    }

    fn chart_target<'a>(&self, output: &'a ChartArgs) -> CliResult<ChartTarget<'a>> {
        if let Some(path) = &output.png {
            return Ok(ChartTarget::Png(path));
        }

        let config = self.config.get();
        let shortener = if output.shorten || config.shortener.enabled {
            Some(BitlyShortener::new(&config.shortener)?)
        } else {
            None
        };
        Ok(ChartTarget::Url(shortener))
    }

    async fn publish(
        &self,
        request: &ChartRequest,
        target: ChartTarget<'_>,
    ) -> CliResult<ChartOutput> {
        match target {
            ChartTarget::Png(path) => {
                let rendered = self
                    .service
                    .publish(request, &self.bitmap_renderer, None)
                    .await?;
                write_png(rendered, path).await
            }
            ChartTarget::Url(shortener) => {
                let rendered = self
                    .service
                    .publish(
                        request,
                        &self.url_renderer,
                        shortener.as_ref().map(|s| s as &dyn LinkShortener),
                    )
                    .await?;
                match rendered {
                    RenderedChart::Url(url) => Ok(ChartOutput::Url { url }),
                    RenderedChart::Png(_) => {
                        Err(TweetalyticsError::render("Chart service returned an image").into())
                    }
                }
            }
        }
    }
}

/// Where a chart goes, resolved before any data is fetched.
enum ChartTarget<'a> {
    Png(&'a Path),
    Url(Option<BitlyShortener>),
}

async fn write_png(rendered: RenderedChart, path: &Path) -> CliResult<ChartOutput> {
    let RenderedChart::Png(bytes) = rendered else {
        return Err(TweetalyticsError::render("Bitmap renderer returned a link").into());
    };
    tokio::fs::write(path, &bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "Wrote chart");
    Ok(ChartOutput::Png {
        path: path.to_path_buf(),
        bytes: bytes.len(),
    })
}
