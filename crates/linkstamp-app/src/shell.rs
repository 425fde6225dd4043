// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive shell — reads commands from stdin, drives the session, and runs
// exports in the background so the prompt stays responsive.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use linkstamp_core::AppConfig;
use linkstamp_core::error::{LinkstampError, Result};
use linkstamp_core::human_errors::{Severity, humanize_error};
use linkstamp_document::{ExportComposer, ExportSummary};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::command::{Command, HELP, parse_command};
use crate::services::downloads;
use crate::session::{ExportJob, Session, SourceDocument};

/// What the loop should do after a command ran.
#[derive(Debug)]
pub enum Outcome {
    Reply(String),
    /// Run this export in the background.
    Export(ExportJob),
    Quit,
}

/// A finished, delivered export.
#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    pub summary: ExportSummary,
}

pub struct Shell {
    session: Session,
    composer: ExportComposer,
    download_dir: PathBuf,
    export_file_name: String,
}

impl Shell {
    pub fn new(config: &AppConfig, download_dir: PathBuf) -> Self {
        Self {
            session: Session::new(),
            composer: ExportComposer::new(config.overlay.clone(), config.export_scope),
            download_dir,
            export_file_name: config.export_file_name.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read `path` and make it the selected document.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn open(&mut self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let document = tokio::task::spawn_blocking(move || SourceDocument::inspect(name, bytes))
            .await
            .map_err(|err| LinkstampError::BackgroundTask(err.to_string()))?;

        let reply = match document.page_count() {
            Some(pages) => format!("Opened {} ({} page(s)).", document.name(), pages),
            None => format!(
                "Opened {} (not a readable PDF; export will fail).",
                document.name()
            ),
        };
        self.session.select_file(document);
        Ok(reply)
    }

    /// Apply one command to the session.
    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, "executing");
        let reply = match command {
            Command::Open(path) => self.open(&path).await?,
            Command::Link(text) => {
                self.session.set_link_text(text);
                match self.session.link_text() {
                    "" => "Link draft cleared.".to_owned(),
                    draft => format!("Link draft: {draft}"),
                }
            }
            Command::Add(text) => {
                if let Some(text) = text {
                    self.session.set_link_text(text);
                }
                if self.session.add_annotation() {
                    format!("Added to page {}.", self.session.current_page())
                } else {
                    "Nothing added: the link is empty.".to_owned()
                }
            }
            Command::Page(page) => {
                self.session.set_current_page(page);
                self.session.status_line()
            }
            Command::Next => self.moved(Session::next_page, "Already on the last page."),
            Command::Previous => self.moved(Session::previous_page, "Already on the first page."),
            Command::List => self.list_current(),
            Command::All => self.list_all(),
            Command::Export => match self.session.begin_export(&self.composer)? {
                Some(job) => return Ok(Outcome::Export(job)),
                None => "Nothing to export: open a PDF first.".to_owned(),
            },
            Command::Status => {
                let mut status = self.session.status_line();
                if !self.session.link_text().is_empty() {
                    status.push_str(&format!("\nLink draft: {}", self.session.link_text()));
                }
                if self.session.is_exporting() {
                    status.push_str("\nExport running.");
                }
                status
            }
            Command::Help => HELP.to_owned(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Reply(reply))
    }

    fn moved(&mut self, step: fn(&mut Session) -> bool, at_edge: &str) -> String {
        if step(&mut self.session) {
            self.session.status_line()
        } else {
            at_edge.to_owned()
        }
    }

    fn list_current(&self) -> String {
        let page = self.session.current_page();
        let lines: Vec<String> = self
            .session
            .current_annotations()
            .enumerate()
            .map(|(index, annotation)| format!("  {}. {}", index + 1, annotation.link()))
            .collect();
        if lines.is_empty() {
            format!("No annotations on page {page}.")
        } else {
            format!("Page {page}:\n{}", lines.join("\n"))
        }
    }

    fn list_all(&self) -> String {
        let all = self.session.annotations().all();
        if all.is_empty() {
            return "No annotations yet.".to_owned();
        }
        let lines: Vec<String> = all
            .iter()
            .enumerate()
            .map(|(index, annotation)| format!("  {}. {}", index + 1, annotation))
            .collect();
        format!(
            "{} annotation(s), each written on every exported page:\n{}",
            all.len(),
            lines.join("\n")
        )
    }

    /// Finish an export started by [`Shell::execute`] and describe the result.
    pub fn complete_export(&mut self, outcome: Result<ExportReport>) -> Result<String> {
        self.session.finish_export();
        let report = outcome?;
        let mut reply = format!(
            "Saved {} ({} page(s), {} with links).",
            report.path.display(),
            report.summary.pages,
            report.summary.stamped_pages
        );
        if report.summary.replaced_chars > 0 {
            reply.push_str(&format!(
                "\n{} character(s) could not be encoded and were written as '?'.",
                report.summary.replaced_chars
            ));
        }
        Ok(reply)
    }

    fn spawn_export(&self, job: ExportJob, done: mpsc::UnboundedSender<Result<ExportReport>>) {
        let dir = self.download_dir.clone();
        let file_name = self.export_file_name.clone();
        tokio::spawn(async move {
            let outcome = export_and_deliver(job, dir, file_name).await;
            done.send(outcome).ok();
        });
    }

    /// Run the prompt loop on stdin until `quit` or end of input.
    pub async fn run(self, initial_file: Option<PathBuf>, start_page: Option<u32>) -> Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin()), initial_file, start_page)
            .await
    }

    /// Run the prompt loop over `input`.
    ///
    /// A read error ends the loop like end of input does; a running export is
    /// still awaited before the error is returned.
    pub async fn run_with<R>(
        mut self,
        input: R,
        initial_file: Option<PathBuf>,
        start_page: Option<u32>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(session = %self.session.id(), download_dir = %self.download_dir.display(), "shell started");

        if let Some(path) = initial_file {
            match self.open(&path).await {
                Ok(reply) => println!("{reply}"),
                Err(err) => report_error(&err),
            }
        }
        if let Some(page) = start_page {
            self.session.set_current_page(page);
        }
        println!("{}\nType `help` for commands.", self.session.status_line());

        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut lines = input.lines();
        let mut read_error = None;
        prompt();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(err) => {
                            error!(error = %err, "reading input failed");
                            read_error = Some(err);
                            break;
                        }
                    };
                    match parse_command(&line) {
                        Ok(None) => {}
                        Ok(Some(command)) => match self.execute(command).await {
                            Ok(Outcome::Reply(reply)) => println!("{reply}"),
                            Ok(Outcome::Export(job)) => {
                                println!(
                                    "Exporting {} with {} annotation(s)...",
                                    job.document_name(),
                                    job.annotation_count()
                                );
                                self.spawn_export(job, done_tx.clone());
                            }
                            Ok(Outcome::Quit) => break,
                            Err(err) => report_error(&err),
                        },
                        Err(err) => report_error(&err),
                    }
                    prompt();
                }
                Some(outcome) = done_rx.recv() => {
                    match self.complete_export(outcome) {
                        Ok(reply) => println!("\n{reply}"),
                        Err(err) => report_error(&err),
                    }
                    prompt();
                }
            }
        }

        if self.session.is_exporting() {
            println!("Waiting for the export to finish...");
            if let Some(outcome) = done_rx.recv().await {
                match self.complete_export(outcome) {
                    Ok(reply) => println!("{reply}"),
                    Err(err) => report_error(&err),
                }
            }
        }
        info!(session = %self.session.id(), "shell stopped");
        match read_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

/// Compose on the blocking pool, then deliver to `dir/file_name`.
pub async fn export_and_deliver(job: ExportJob, dir: PathBuf, file_name: String) -> Result<ExportReport> {
    let (bytes, summary) = tokio::task::spawn_blocking(move || job.run())
        .await
        .map_err(|err| LinkstampError::BackgroundTask(err.to_string()))??;
    let path = downloads::deliver(&bytes, &dir, &file_name).await?;
    Ok(ExportReport { path, summary })
}

fn prompt() {
    print!("> ");
    std::io::stdout().flush().ok();
}

fn report_error(err: &LinkstampError) {
    let human = humanize_error(err);
    match human.severity {
        Severity::Ignored => debug!(error = %err, "ignored"),
        Severity::Permanent | Severity::Environment => {
            error!(error = %err, "command failed");
            println!("{human}");
        }
        Severity::ActionRequired => println!("{human}"),
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;
    use linkstamp_core::ExportScope;
    use linkstamp_document::PdfReader;
    use linkstamp_document::pdf::fixtures::blank_pdf;
    use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

    fn reply(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(text) => text,
            other => panic!("expected a reply, got {other:?}"),
        }
    }

    async fn shell_with_document(dir: &Path, pages: usize, config: &AppConfig) -> Shell {
        let path = dir.join("input.pdf");
        std::fs::write(&path, blank_pdf(pages)).expect("write input");
        let mut shell = Shell::new(config, dir.join("downloads"));
        shell.open(&path).await.expect("open");
        shell
    }

    #[tokio::test]
    async fn open_reports_page_count() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("three.pdf");
        std::fs::write(&path, blank_pdf(3)).expect("write");

        let mut shell = Shell::new(&AppConfig::default(), tmp.path().to_path_buf());
        let text = reply(shell.execute(Command::Open(path)).await.expect("open"));
        assert_eq!(text, "Opened three.pdf (3 page(s)).");
        assert_eq!(shell.session().total_pages(), Some(3));
    }

    #[tokio::test]
    async fn open_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut shell = Shell::new(&AppConfig::default(), tmp.path().to_path_buf());
        let result = shell.execute(Command::Open(tmp.path().join("absent.pdf"))).await;
        assert!(matches!(result, Err(LinkstampError::Io(_))));
        assert!(shell.session().source().is_none());
    }

    #[tokio::test]
    async fn add_and_list_follow_the_current_page() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut shell = shell_with_document(tmp.path(), 2, &AppConfig::default()).await;

        shell.execute(Command::Link("http://a".into())).await.expect("link");
        let added = reply(shell.execute(Command::Add(None)).await.expect("add"));
        assert_eq!(added, "Added to page 1.");

        shell.execute(Command::Next).await.expect("next");
        let empty = reply(shell.execute(Command::List).await.expect("list"));
        assert_eq!(empty, "No annotations on page 2.");

        let all = reply(shell.execute(Command::All).await.expect("all"));
        assert!(all.contains("p.1 http://a"));
    }

    #[tokio::test]
    async fn blank_add_reports_nothing_added() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut shell = shell_with_document(tmp.path(), 1, &AppConfig::default()).await;
        let text = reply(shell.execute(Command::Add(Some("  ".into()))).await.expect("add"));
        assert_eq!(text, "Nothing added: the link is empty.");
    }

    #[tokio::test]
    async fn navigation_replies_at_the_edges() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut shell = shell_with_document(tmp.path(), 1, &AppConfig::default()).await;
        let text = reply(shell.execute(Command::Previous).await.expect("prev"));
        assert_eq!(text, "Already on the first page.");
        let text = reply(shell.execute(Command::Next).await.expect("next"));
        assert_eq!(text, "Already on the last page.");
    }

    #[tokio::test]
    async fn export_without_document_replies() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut shell = Shell::new(&AppConfig::default(), tmp.path().to_path_buf());
        let text = reply(shell.execute(Command::Export).await.expect("export"));
        assert_eq!(text, "Nothing to export: open a PDF first.");
    }

    #[tokio::test]
    async fn export_writes_every_annotation_on_every_page() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut shell = shell_with_document(tmp.path(), 3, &AppConfig::default()).await;

        shell.execute(Command::Add(Some("http://a".into()))).await.expect("add");
        shell.execute(Command::Page(3)).await.expect("page");
        shell.execute(Command::Add(Some("http://b".into()))).await.expect("add");

        let Outcome::Export(job) = shell.execute(Command::Export).await.expect("export") else {
            panic!("expected an export job");
        };
        assert!(matches!(
            shell.execute(Command::Export).await,
            Err(LinkstampError::ExportInProgress)
        ));

        let outcome = export_and_deliver(job, tmp.path().join("downloads"), "edited_pdf.pdf".into()).await;
        let text = shell.complete_export(outcome).expect("delivered");
        assert!(text.contains("3 page(s)"));
        assert!(!shell.session().is_exporting());

        let output = tmp.path().join("downloads").join("edited_pdf.pdf");
        let reader = PdfReader::open(&output).expect("exported PDF parses");
        assert_eq!(reader.origin(), Some(output.as_path()));
        assert_eq!(reader.page_count(), 3);
        for page in 1..=3 {
            let runs = reader.page_text_runs(page).expect("runs");
            assert_eq!(runs, ["Explore here", "http://a", "Explore here", "http://b"]);
        }
    }

    #[tokio::test]
    async fn attached_page_scope_is_honoured() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            export_scope: ExportScope::AttachedPage,
            ..AppConfig::default()
        };
        let mut shell = shell_with_document(tmp.path(), 2, &config).await;
        shell.execute(Command::Add(Some("http://a".into()))).await.expect("add");

        let Outcome::Export(job) = shell.execute(Command::Export).await.expect("export") else {
            panic!("expected an export job");
        };
        let outcome = export_and_deliver(job, tmp.path().to_path_buf(), "out.pdf".into()).await;
        shell.complete_export(outcome).expect("delivered");

        let reader = PdfReader::open(tmp.path().join("out.pdf")).expect("parse");
        assert_eq!(reader.page_text_runs(1).expect("runs"), ["Explore here", "http://a"]);
        assert!(reader.page_text_runs(2).expect("runs").is_empty());
    }

    #[tokio::test]
    async fn failed_export_clears_the_in_flight_flag() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-not really").expect("write");

        let mut shell = Shell::new(&AppConfig::default(), tmp.path().to_path_buf());
        shell.open(&path).await.expect("open");
        let Outcome::Export(job) = shell.execute(Command::Export).await.expect("export") else {
            panic!("expected an export job");
        };
        let outcome = export_and_deliver(job, tmp.path().to_path_buf(), "out.pdf".into()).await;

        assert!(matches!(
            shell.complete_export(outcome),
            Err(LinkstampError::DocumentParse(_))
        ));
        assert!(!shell.session().is_exporting());
        assert!(!tmp.path().join("out.pdf").exists());
    }

    /// Input that fails on every read, like a closed terminal.
    struct BrokenInput;

    impl AsyncRead for BrokenInput {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "input closed",
            )))
        }
    }

    #[tokio::test]
    async fn read_error_still_waits_for_the_running_export() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let input_path = tmp.path().join("input.pdf");
        std::fs::write(&input_path, blank_pdf(2)).expect("write input");
        let downloads = tmp.path().join("downloads");

        let input = BufReader::new((&b"add http://a\nexport\n"[..]).chain(BrokenInput));
        let shell = Shell::new(&AppConfig::default(), downloads.clone());
        let result = shell.run_with(input, Some(input_path), None).await;

        assert!(matches!(result, Err(LinkstampError::Io(_))));
        let reader = PdfReader::open(downloads.join("edited_pdf.pdf")).expect("export delivered");
        assert_eq!(reader.page_text_runs(2).expect("runs"), ["Explore here", "http://a"]);
    }

    #[tokio::test]
    async fn quit_waits_for_the_running_export() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let input_path = tmp.path().join("input.pdf");
        std::fs::write(&input_path, blank_pdf(1)).expect("write input");

        let input = BufReader::new(&b"add http://a\nexport\nquit\n"[..]);
        let shell = Shell::new(&AppConfig::default(), tmp.path().to_path_buf());
        shell
            .run_with(input, Some(input_path), None)
            .await
            .expect("clean exit");

        assert!(tmp.path().join("edited_pdf.pdf").exists());
    }
}
