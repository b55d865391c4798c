use clap::{Parser, Subcommand};
use eyre::Context;
use std::io::IsTerminal;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_live::{
    AccessToken, BroadcastHandle, BroadcastLifeCycleStatus, ChatMessage, ChatPoller,
    ChatPollerConfig, ClientConfig, PrivacyStatus, YouTubeClient, lifecycle,
};

/// Drive a YouTube live broadcast and follow its chat.
#[derive(Parser)]
#[command(name = "youtube-live-cli", version)]
struct Cli {
    /// OAuth bearer token with the `youtube` scope.
    #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a broadcast bound to a new RTMP stream.
    Create(CreateArgs),
    /// Move a broadcast into testing.
    Test { broadcast_id: String },
    /// Make a broadcast live. It must be in testing first.
    Start { broadcast_id: String },
    /// End a broadcast.
    Stop { broadcast_id: String },
    /// Print a broadcast's snippet and status.
    State { broadcast_id: String },
    /// Print live chat messages until Ctrl-C.
    Chat { broadcast_id: String },
    /// Create a broadcast, take it live, follow chat until Ctrl-C, then end it.
    GoLive {
        #[command(flatten)]
        create: CreateArgs,
        /// How long to wait for the broadcast to settle into testing before going live.
        #[arg(long, default_value_t = 10)]
        settle_secs: u64,
    },
}

#[derive(clap::Args)]
struct CreateArgs {
    #[arg(long, default_value = "Title")]
    title: String,
    #[arg(long, default_value = "Description")]
    description: String,
    #[arg(long, default_value_t = PrivacyStatus::Unlisted)]
    privacy: PrivacyStatus,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("load YouTube API configuration")?;
    let yt = YouTubeClient::new(&config);
    let token = AccessToken::new(cli.token);

    match cli.command {
        Command::Create(args) => {
            let handle = create(&yt, &token, &args).await?;
            print_handle(&handle);
        }
        Command::Test { broadcast_id } => {
            lifecycle::test(&yt, &token, &broadcast_id)
                .await
                .context("transition broadcast to testing")?;
        }
        Command::Start { broadcast_id } => {
            lifecycle::start(&yt, &token, &broadcast_id)
                .await
                .context("transition broadcast to live")?;
        }
        Command::Stop { broadcast_id } => {
            lifecycle::stop(&yt, &token, &broadcast_id)
                .await
                .context("transition broadcast to complete")?;
        }
        Command::State { broadcast_id } => {
            let state = lifecycle::fetch_broadcast_state(&yt, &token, &broadcast_id)
                .await
                .context("fetch broadcast state")?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Chat { broadcast_id } => {
            follow_chat(&yt, &token, &broadcast_id).await?;
        }
        Command::GoLive {
            create: args,
            settle_secs,
        } => {
            let handle = create(&yt, &token, &args).await?;
            print_handle(&handle);
            let broadcast_id = &handle.broadcast_id;

            lifecycle::test(&yt, &token, broadcast_id)
                .await
                .context("transition broadcast to testing")?;
            wait_for_testing(&yt, &token, broadcast_id, Duration::from_secs(settle_secs)).await?;
            lifecycle::start(&yt, &token, broadcast_id)
                .await
                .context("transition broadcast to live")?;
            eprintln!("==> live: https://youtu.be/{broadcast_id}");

            let chat = follow_chat(&yt, &token, broadcast_id).await;

            // End the broadcast even if chat polling failed.
            lifecycle::stop(&yt, &token, broadcast_id)
                .await
                .context("transition broadcast to complete")?;
            chat?;
        }
    }

    Ok(())
}

async fn create(
    yt: &YouTubeClient,
    token: &AccessToken,
    args: &CreateArgs,
) -> eyre::Result<BroadcastHandle> {
    youtube_live::create_broadcast_and_bind(
        yt,
        token,
        &args.title,
        &args.description,
        args.privacy,
    )
    .await
    .context("create broadcast and bind it to a stream")
}

fn print_handle(handle: &BroadcastHandle) {
    println!("broadcast id: {}", handle.broadcast_id);
    println!("stream name:  {}", handle.stream_name);
    if let Some(url) = handle.rtmp_url() {
        println!("rtmp url:     {url}");
    }
}

/// Polls the broadcast's status until it reports `testing` or `settle` has passed.
async fn wait_for_testing(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
    settle: Duration,
) -> eyre::Result<()> {
    let deadline = tokio::time::Instant::now() + settle;
    loop {
        let status = lifecycle::broadcast_status(yt, token, broadcast_id)
            .await
            .context("read broadcast status")?;
        if status == BroadcastLifeCycleStatus::Testing {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(%status, "broadcast did not reach testing in time, going live anyway");
            return Ok(());
        }
        tracing::debug!(%status, "waiting for broadcast to reach testing");
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

/// Prints chat messages until Ctrl-C or until the poller fails.
async fn follow_chat(
    yt: &YouTubeClient,
    token: &AccessToken,
    broadcast_id: &str,
) -> eyre::Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let poller = ChatPoller::spawn(
        yt.clone(),
        token.clone(),
        broadcast_id,
        tx,
        ChatPollerConfig::default(),
    );

    let mut messages = UnboundedReceiverStream::new(rx);
    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());
    loop {
        tokio::select! {
            message = messages.next() => match message {
                Some(ChatMessage { author, text }) => println!("[{author}] {text}"),
                // The poller dropped its sender, so it has stopped on its own.
                None => break,
            },
            interrupted = &mut ctrl_c => {
                interrupted.context("listen for Ctrl-C")?;
                tracing::info!("interrupted, stopping chat poller");
                break;
            }
        }
    }

    poller.shutdown().await.context("poll live chat")
}
