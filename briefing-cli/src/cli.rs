use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use briefing_core::{
    Config, NotificationRequest, Notifier, WttrClient, jokes, notify, weather,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "briefing", version, about = "Daily briefing CLI: weather, jokes, push messages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the defaults (city, forecast days, sendkey env var).
    Configure,

    /// Multi-day hourly forecast report.
    Weather {
        /// City name; falls back to the configured default.
        city: Option<String>,

        /// Start date, YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Number of consecutive days to fetch (>= 1).
        #[arg(long)]
        days: Option<u32>,
    },

    /// One-line current conditions.
    Current {
        /// City name; falls back to the configured default.
        city: Option<String>,
    },

    /// Print a random joke from the built-in catalog.
    Joke {
        /// Restrict the pick to one category, e.g. 程序员.
        #[arg(long)]
        category: Option<String>,

        /// Seed for reproducible picks.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List joke categories with per-category counts.
    Categories,

    /// Push a message through the notification gateway.
    Notify {
        /// Message title (up to 256 characters).
        title: String,

        /// Optional body; Markdown is rendered by the receiving client.
        #[arg(long)]
        body: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Weather { city, date, days } => weather_report(city, date, days).await,
            Command::Current { city } => current_conditions(city).await,
            Command::Joke { category, seed } => {
                print_joke(category, seed);
                Ok(())
            }
            Command::Categories => {
                print_categories();
                Ok(())
            }
            Command::Notify { title, body } => send_notification(title, body).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let city = inquire::Text::new("默认城市:")
        .with_default(cfg.default_city.as_deref().unwrap_or("茂名"))
        .prompt()?;

    let days_text = inquire::Text::new("默认预测天数:")
        .with_default(&cfg.days_or_default(None).to_string())
        .prompt()?;
    let days: u32 = days_text.trim().parse().context("预测天数必须是正整数")?;
    if days < 1 {
        anyhow::bail!("预测天数必须至少为1天");
    }

    let env_name = inquire::Text::new("推送密钥环境变量名:")
        .with_default(cfg.sendkey_env_name())
        .prompt()?;

    cfg.default_city = Some(city);
    cfg.forecast_days = Some(days);
    cfg.sendkey_env = Some(env_name);
    cfg.save()?;

    println!("已保存配置：{}", Config::config_file_path()?.display());
    Ok(())
}

async fn weather_report(
    city: Option<String>,
    date: Option<String>,
    days: Option<u32>,
) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let city = cfg.city_or_default(city)?;
    let days = cfg.days_or_default(days);

    let start = match date {
        Some(text) => weather::parse_start_date(&text)?,
        None => Local::now().date_naive(),
    };

    println!("\n正在查询 {city} 从 {} 开始的 {days} 天天气预报...", start.format("%Y-%m-%d"));
    println!("{}", "=".repeat(70));

    let client = WttrClient::new();
    let span = weather::forecast_span(&client, &city, start, days).await?;

    println!("{}", weather::render_report(&span));
    Ok(())
}

async fn current_conditions(city: Option<String>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let city = cfg.city_or_default(city)?;

    let client = WttrClient::new();
    let line = client.fetch_current(&city).await?;

    let today = Local::now().date_naive();
    println!("{today} {city}的天气: {line}");
    Ok(())
}

fn print_joke(category: Option<String>, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (joke, fallback) = match &category {
        Some(category) => {
            let pick = jokes::random_joke_in_category(&mut rng, category);
            (pick.joke, pick.fallback)
        }
        None => (jokes::random_joke(&mut rng), false),
    };

    // The requested category had no jokes; say so instead of silently
    // broadening the search.
    if let (true, Some(category)) = (fallback, &category) {
        println!("没有找到「{category}」类别的笑话，来个随机的吧：");
    }

    println!("😂 随机笑话 - {}", joke.category);
    println!("{}", joke.text);
    println!("\n开心一笑，放松心情～");
}

fn print_categories() {
    let counts = jokes::category_counts();

    println!("笑话分类（共 {} 条）：", jokes::CATALOG.len());
    for (category, count) in &counts {
        println!("  {category}: {count}条");
    }
}

async fn send_notification(title: String, body: Option<String>) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let send_key = notify::send_key_from_env(cfg.sendkey_env_name())?;

    let mut request = NotificationRequest::new(title);
    if let Some(body) = body {
        request = request.with_body(body);
    }

    let notifier = Notifier::new();
    match notifier.send(&send_key, &request).await {
        Ok(()) => {
            println!("✅ 消息推送成功！");
            Ok(())
        }
        Err(err) => {
            println!("❌ 推送失败：{err}");
            anyhow::bail!("notification was not delivered")
        }
    }
}
