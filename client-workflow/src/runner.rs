use crate::{
    config::{ClientConfig, ClientFileConfig},
    history_table::{
        HistoryFilters, HistoryTable, HistoryView, Navigation,
        handler::{HistoryTableCommand, HistoryTableHandler},
    },
    pages::{HistoryScreen, ResultPanel, UploadPage},
    result_view::render_result,
    traits::DetectionApiMaker,
};
use detection_api_caller::{
    image_file::ImageFile, json::history::HistoryPage, make_detection_client, traits::DetectionApi,
};
use logging::init_logging;
use options::run_options::{
    GlobalOptions, RunCommand, RunOptions, browse_options::BrowseOptions,
    history_options::HistoryOptions, upload_options::UploadOptions,
};
use std::{process::ExitCode, sync::Arc};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::{mpsc::UnboundedSender, oneshot},
};

const BROWSE_PROMPT: &str = "[n]ext, [p]revious, <page number>, [r]eload, [q]uit > ";

/// Whether the command did what was asked. Failures reported by the service are
/// rendered to the output and end up here, not in an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    Failure,
}

impl From<CommandOutcome> for ExitCode {
    fn from(outcome: CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Success => ExitCode::SUCCESS,
            CommandOutcome::Failure => ExitCode::FAILURE,
        }
    }
}

pub async fn run(options: RunOptions) -> anyhow::Result<CommandOutcome> {
    init_logging();

    let api_maker = |cfg: &ClientConfig| make_detection_client(cfg.into());

    run_with(
        options,
        api_maker,
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

pub async fn run_with<M, R, W>(
    options: RunOptions,
    api_maker: M,
    input: R,
    mut output: W,
) -> anyhow::Result<CommandOutcome>
where
    M: DetectionApiMaker,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let config = Arc::new(resolve_config(&options.global)?);

    tracing::info!(
        "Using detection API at {} ({} environment)",
        config.api_url(),
        config.env()
    );

    let api = api_maker(config.as_ref())?;

    let outcome = run_command(options.command, config, api, input, &mut output).await?;
    output.flush().await?;

    Ok(outcome)
}

fn resolve_config(global: &GlobalOptions) -> anyhow::Result<ClientConfig> {
    let file_config = match &global.config_file_path {
        Some(path) => ClientFileConfig::from_file(path)?,
        None => ClientFileConfig::default(),
    };

    Ok(ClientConfig::from_env_layered(
        global.api_url.as_deref(),
        &file_config,
    ))
}

pub async fn run_command<R, W>(
    command: RunCommand,
    config: Arc<ClientConfig>,
    api: Arc<dyn DetectionApi>,
    input: R,
    output: &mut W,
) -> anyhow::Result<CommandOutcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match command {
        RunCommand::Upload(upload_options) => {
            upload(&upload_options, config, api.as_ref(), output).await
        }
        RunCommand::History(history_options) => {
            history(&history_options, &config, api.as_ref(), output).await
        }
        RunCommand::Show(show_options) => {
            let outcome = match api.detection_by_id(show_options.id).await {
                Ok(result) => {
                    let rendered = render_result(&config, Some(&result)).unwrap_or_default();
                    write_line(output, &rendered).await?;
                    CommandOutcome::Success
                }
                Err(e) => {
                    write_line(output, &format!("Error: {e}")).await?;
                    CommandOutcome::Failure
                }
            };
            Ok(outcome)
        }
        RunCommand::Browse(browse_options) => {
            browse(&browse_options, config, api, input, output).await
        }
        RunCommand::Ping => {
            let outcome = match api.test_call().await {
                Ok(status) => {
                    let environment = status.environment.as_deref().unwrap_or("unknown");
                    write_line(
                        output,
                        &format!("{} (environment: {environment})", status.message),
                    )
                    .await?;
                    CommandOutcome::Success
                }
                Err(e) => {
                    write_line(output, &format!("Error: {e}")).await?;
                    CommandOutcome::Failure
                }
            };
            Ok(outcome)
        }
    }
}

async fn upload<W: AsyncWrite + Unpin>(
    options: &UploadOptions,
    config: Arc<ClientConfig>,
    api: &dyn DetectionApi,
    output: &mut W,
) -> anyhow::Result<CommandOutcome> {
    let file = ImageFile::from_path(&options.file_path).await?;

    let mut page = UploadPage::new(config);
    let threshold = page
        .form_mut()
        .set_confidence_threshold(options.confidence_threshold);
    if (threshold - options.confidence_threshold).abs() > f64::EPSILON {
        tracing::info!(
            "Confidence threshold {} adjusted to {threshold}",
            options.confidence_threshold
        );
    }
    page.form_mut().select_file(file);

    page.upload(api).await?;

    write_line(output, &page.render()).await?;

    Ok(match page.panel() {
        ResultPanel::Showing(_) => CommandOutcome::Success,
        ResultPanel::Empty | ResultPanel::Processing => CommandOutcome::Failure,
    })
}

async fn history<W: AsyncWrite + Unpin>(
    options: &HistoryOptions,
    config: &ClientConfig,
    api: &dyn DetectionApi,
    output: &mut W,
) -> anyhow::Result<CommandOutcome> {
    let filters = HistoryFilters {
        min_people: options.min_people,
        max_people: options.max_people,
        date_from: options.date_from,
        date_to: options.date_to,
    };
    let mut table = HistoryTable::starting_at(options.page, filters);

    let request = table.mount();
    let result = api
        .detection_history(request.query())
        .await
        .map(HistoryPage::from);
    table.apply(&request, result);

    write_line(output, &HistoryScreen::new(table.render(config)).to_string()).await?;

    Ok(if table.error().is_some() {
        CommandOutcome::Failure
    } else {
        CommandOutcome::Success
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseInput {
    Navigate(Navigation),
    Reload,
    Quit,
}

fn parse_browse_input(line: &str) -> Option<BrowseInput> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "n" | "next" => Some(BrowseInput::Navigate(Navigation::Next)),
        "p" | "prev" | "previous" => Some(BrowseInput::Navigate(Navigation::Previous)),
        "r" | "reload" => Some(BrowseInput::Reload),
        "q" | "quit" => Some(BrowseInput::Quit),
        other => other
            .parse::<u32>()
            .ok()
            .map(|page| BrowseInput::Navigate(Navigation::Page(page))),
    }
}

async fn browse<R, W>(
    options: &BrowseOptions,
    config: Arc<ClientConfig>,
    api: Arc<dyn DetectionApi>,
    input: R,
    output: &mut W,
) -> anyhow::Result<CommandOutcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (command_sender, command_receiver) = tokio::sync::mpsc::unbounded_channel();
    let handler = HistoryTableHandler::new(
        command_receiver,
        api,
        config,
        HistoryTable::starting_at(options.page, HistoryFilters::default()),
    );
    let handler_task = tokio::task::spawn(handler.run());

    let result = browse_loop(&command_sender, input, output).await;

    if command_sender.send(HistoryTableCommand::Stop).is_err() {
        tracing::warn!("History handler was already stopped");
    }
    handler_task.await?;

    result
}

async fn browse_loop<R, W>(
    commands: &UnboundedSender<HistoryTableCommand>,
    input: R,
    output: &mut W,
) -> anyhow::Result<CommandOutcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut redraw = true;

    loop {
        if redraw {
            let view = view_when_loaded(commands).await?;
            write_line(output, &HistoryScreen::new(view).to_string()).await?;
        }

        output.write_all(BROWSE_PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            write_line(output, "").await?;
            break;
        };

        redraw = match parse_browse_input(&line) {
            Some(BrowseInput::Quit) => break,
            Some(BrowseInput::Reload) => {
                send_command(commands, HistoryTableCommand::Reload)?;
                true
            }
            Some(BrowseInput::Navigate(navigation)) => {
                let (started_sender, started_receiver) = oneshot::channel();
                send_command(
                    commands,
                    HistoryTableCommand::Navigate(navigation, Some(started_sender)),
                )?;
                let started = started_receiver.await?;
                if !started {
                    write_line(output, "No such page").await?;
                }
                started
            }
            None => {
                write_line(output, &format!("Unknown input `{}`", line.trim())).await?;
                false
            }
        };
    }

    Ok(CommandOutcome::Success)
}

async fn view_when_loaded(
    commands: &UnboundedSender<HistoryTableCommand>,
) -> anyhow::Result<HistoryView> {
    let (view_sender, view_receiver) = oneshot::channel();
    send_command(commands, HistoryTableCommand::GetViewWhenLoaded(view_sender))?;
    Ok(view_receiver.await?)
}

fn send_command(
    commands: &UnboundedSender<HistoryTableCommand>,
    command: HistoryTableCommand,
) -> anyhow::Result<()> {
    commands
        .send(command)
        .map_err(|_| anyhow::anyhow!("History handler stopped unexpectedly"))
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}
