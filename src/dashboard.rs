use actix_web::{get, web, HttpResponse, Responder};
use build_html::{Html, HtmlContainer, HtmlPage};
use itertools::Itertools;
use plotly::common::{Mode, Title};
use plotly::{Layout, Plot, Scatter};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db::series_archive::SeriesArchive;
use crate::metrics::MetricSnapshot;
use crate::news::{Article, NewsCategory, NewsClient, NewsTopic};
use crate::series::{EconSeries, SeriesTable};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// At most this many articles are rendered per fetch.
pub const MAX_ARTICLES: usize = 5;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 900px; margin: 2em auto; color: #31333f; }
h1 { margin-bottom: 0.2em; }
hr { border: none; border-top: 1px solid #d6d6d8; margin: 1.5em 0; }
.metric-row { display: flex; gap: 4em; margin: 1em 0; }
.metric-label { font-size: 0.9em; color: #555; }
.metric-value { font-size: 2.2em; font-weight: 600; }
.metric-delta { font-size: 1em; }
.delta-good { color: #09ab3b; }
.delta-bad { color: #ff2b2b; }
.delta-flat { color: #808495; }
.news-error { color: #ff2b2b; }
form label { display: block; margin: 0.6em 0; }
form select { margin-left: 0.5em; }
form button { margin-top: 0.6em; }
"#;

/// State of the news block for one render.
#[derive(Debug)]
pub enum NewsPanel {
    /// The "Get News" button has not been pressed.
    Idle {
        category: NewsCategory,
        topic: NewsTopic,
    },
    Fetched {
        category: NewsCategory,
        topic: NewsTopic,
        articles: Vec<Article>,
    },
    Failed {
        category: NewsCategory,
        topic: NewsTopic,
        message: String,
    },
}

impl NewsPanel {
    pub fn idle() -> NewsPanel {
        NewsPanel::Idle {
            category: NewsCategory::Business,
            topic: NewsTopic::None,
        }
    }

    fn selection(&self) -> (NewsCategory, NewsTopic) {
        match self {
            NewsPanel::Idle { category, topic }
            | NewsPanel::Fetched {
                category, topic, ..
            }
            | NewsPanel::Failed {
                category, topic, ..
            } => (*category, *topic),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub category: Option<NewsCategory>,
    pub topic: Option<NewsTopic>,
    /// Present only when the "Get News" button was pressed.
    pub get_news: Option<String>,
}

/// The whole page, re-rendered from scratch on every request: CPI block,
/// GDP block, unemployment block, news block, separated by dividers.
pub fn render_page(blocks: &[(SeriesTable, MetricSnapshot)], news: &NewsPanel) -> String {
    let mut body = String::new();
    for (table, snapshot) in blocks {
        body.push_str(&series_section(table, snapshot));
    }
    body.push_str(&news_section(news));

    HtmlPage::new()
        .with_title("US Economy Dashboard")
        .with_script_link(PLOTLY_CDN)
        .with_style(STYLE)
        .with_raw(body)
        .to_html_string()
}

fn series_section(table: &SeriesTable, snapshot: &MetricSnapshot) -> String {
    let series = table.series;
    let chart_div = format!("chart-{}", series);
    format!(
        r#"<section>
<h1>{}</h1>
<p>{}</p>
<hr/>
{}
{}
<hr/>
</section>
"#,
        series.title(),
        series.description(),
        metric_row(snapshot),
        line_chart(table).to_inline_html(Some(chart_div.as_str())),
    )
}

/// Reference and current value side by side, delta badge on the current one.
fn metric_row(snapshot: &MetricSnapshot) -> String {
    let series = snapshot.series;
    format!(
        r#"<div class="metric-row">
  <div class="metric">
    <div class="metric-label">{} {}</div>
    <div class="metric-value">{}</div>
  </div>
  <div class="metric">
    <div class="metric-label">{} Current Month</div>
    <div class="metric-value">{}</div>
    <div class="metric-delta {}">{} {}%</div>
  </div>
</div>"#,
        series.label(),
        snapshot.reference_date.strftime("%B %Y"),
        snapshot.reference_value,
        series.label(),
        snapshot.current_value,
        delta_class(snapshot.percent_delta, series.delta_inverted()),
        delta_arrow(snapshot.percent_delta),
        snapshot.percent_delta.abs(),
    )
}

/// CSS class of the delta badge. A rising value reads as unfavorable for the
/// inverted series (CPI, unemployment) and favorable otherwise.
pub fn delta_class(delta: Decimal, inverted: bool) -> &'static str {
    if delta.is_zero() {
        return "delta-flat";
    }
    let rising = delta > Decimal::ZERO;
    if rising != inverted {
        "delta-good"
    } else {
        "delta-bad"
    }
}

fn delta_arrow(delta: Decimal) -> &'static str {
    if delta < Decimal::ZERO {
        "&#9660;"
    } else {
        "&#9650;"
    }
}

/// (x, y) for the line chart, chronological order. Non-numeric observations
/// (FRED's ".") are left out of the trace.
fn chart_points(table: &SeriesTable) -> (Vec<String>, Vec<f64>) {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for row in table.iter().rev() {
        if let Ok(v) = row.value.trim().parse::<f64>() {
            x.push(row.date.to_string());
            y.push(v);
        }
    }
    (x, y)
}

pub fn line_chart(table: &SeriesTable) -> Plot {
    let (x, y) = chart_points(table);
    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(x, y)
            .mode(Mode::Lines)
            .name(table.series.label()),
    );
    plot.set_layout(Layout::new().title(Title::with_text(table.series.title())));
    plot
}

fn news_section(panel: &NewsPanel) -> String {
    let (category, topic) = panel.selection();

    let category_options = NewsCategory::ALL
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                c,
                if *c == category { " selected" } else { "" },
                c
            )
        })
        .join("\n      ");
    let topic_options = NewsTopic::ALL
        .iter()
        .map(|t| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                t,
                if *t == topic { " selected" } else { "" },
                t
            )
        })
        .join("\n      ");

    let results = match panel {
        NewsPanel::Idle { .. } => String::new(),
        NewsPanel::Failed { message, .. } => {
            format!("<p class=\"news-error\">{}</p>\n", escape(message))
        }
        NewsPanel::Fetched { articles, .. } if articles.is_empty() => {
            "<p>No articles found. Try a different category or topic.</p>\n".to_string()
        }
        NewsPanel::Fetched { articles, .. } => articles
            .iter()
            .take(MAX_ARTICLES)
            .map(article_entry)
            .join("\n"),
    };

    format!(
        r#"<section>
<h1>Latest News</h1>
<p>Stay informed about the latest developments in the U.S. economy by exploring the latest headlines. Understand trends in consumer spending, price fluctuations, and their impacts on households and businesses. Choose a topic of interest to dive deeper into the factors shaping the U.S. economy today.</p>
<form method="get" action="/">
  <label>Select a category
    <select name="category">
      {}
    </select>
  </label>
  <label>Select a topic
    <select name="topic">
      {}
    </select>
  </label>
  <button type="submit" name="get_news" value="1">Get News</button>
</form>
{}
</section>
"#,
        category_options, topic_options, results
    )
}

fn article_entry(article: &Article) -> String {
    format!(
        r#"<p><strong>{}</strong></p>
<p><em>{}</em></p>
<p><a href="{}">{}</a></p>
<hr/>"#,
        escape(&article.title),
        escape(article.description.as_deref().unwrap_or("")),
        article.url,
        escape(&article.url),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[get("/")]
pub async fn index(query: web::Query<NewsQuery>) -> impl Responder {
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let archive = SeriesArchive {
        duckdb_path: config.duckdb_path.clone(),
    };
    let conn = match archive.open_read_only() {
        Ok(c) => c,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };

    let mut blocks = Vec::new();
    for series in EconSeries::ALL {
        let table = match archive.get_table(&conn, series) {
            Ok(t) => t,
            Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        };
        let snapshot = match MetricSnapshot::compute(&table, config.reference_date(series)) {
            Ok(s) => s,
            Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
        };
        blocks.push((table, snapshot));
    }

    let category = query.category.unwrap_or(NewsCategory::Business);
    let topic = query.topic.unwrap_or_default();
    let news = if query.get_news.is_some() {
        let client = NewsClient::new(config.news_api_key.clone());
        match web::block(move || client.top_headlines(category, topic)).await {
            Ok(Ok(articles)) => NewsPanel::Fetched {
                category,
                topic,
                articles,
            },
            Ok(Err(e)) => NewsPanel::Failed {
                category,
                topic,
                message: e.to_string(),
            },
            Err(e) => NewsPanel::Failed {
                category,
                topic,
                message: e.to_string(),
            },
        }
    } else {
        NewsPanel::Idle { category, topic }
    };

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(&blocks, &news))
}

/// Archived observations of one series as JSON, most recent first.
/// http://127.0.0.1:8111/api/series/cpi
#[get("/api/series/{series}")]
pub async fn api_series(path: web::Path<String>) -> impl Responder {
    let series = match path.into_inner().parse::<EconSeries>() {
        Ok(s) => s,
        Err(e) => return HttpResponse::BadRequest().body(e),
    };
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let archive = SeriesArchive {
        duckdb_path: config.duckdb_path,
    };
    let conn = match archive.open_read_only() {
        Ok(c) => c,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    match archive.get_table(&conn, series) {
        Ok(table) => HttpResponse::Ok().json(table.rows()),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
