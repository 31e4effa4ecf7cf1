use crate::core::report::{ExportSummary, ReportWriter};
use crate::domain::model::Identifier;
use crate::domain::ports::{PhoneLookup, ProgressSink, Storage};
use crate::utils::error::{ExtractorError, Result};
use console::style;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const INPUT_EXTENSION: &str = ".txt";
pub const OUTPUT_EXTENSION: &str = ".xlsx";

/// Appends `extension` unless `name` already ends with it.
pub fn with_extension(name: &str, extension: &str) -> String {
    if name.ends_with(extension) {
        name.to_string()
    } else {
        format!("{}{}", name, extension)
    }
}

/// One identifier per line, trimmed; blank lines are skipped.
pub fn parse_identifiers(content: &[u8]) -> Vec<Identifier> {
    String::from_utf8_lossy(content)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Interactive driver: asks for the input and output files, then exports.
pub struct Session<R, W> {
    reader: R,
    writer: W,
    preset_input: Option<String>,
    preset_output: Option<String>,
}

impl<R: AsyncBufRead + Unpin, W: Write> Session<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            preset_input: None,
            preset_output: None,
        }
    }

    /// Answers used for the first round of each prompt.
    pub fn with_presets(mut self, input: Option<String>, output: Option<String>) -> Self {
        self.preset_input = input;
        self.preset_output = output;
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn ask(&mut self, question: &str, preset: Option<String>) -> Result<String> {
        writeln!(self.writer, "{} {}", style("[@]").magenta(), style(question).magenta())?;
        write!(self.writer, "{} ", style("->").yellow())?;

        if let Some(answer) = preset {
            writeln!(self.writer, "{}", answer)?;
            return Ok(answer.trim().to_string());
        }
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(ExtractorError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Re-asks until an existing, readable file is named. Returns its path and content.
    pub async fn prompt_input_file<S: Storage>(&mut self, storage: &S) -> Result<(String, Vec<u8>)> {
        loop {
            let preset = self.preset_input.take();
            let answer = self.ask("Text Input Filename?", preset).await?;
            let path = with_extension(&answer, INPUT_EXTENSION);

            match storage.read_file(&path).await {
                Ok(content) => {
                    let lines = String::from_utf8_lossy(&content).lines().count();
                    writeln!(
                        self.writer,
                        "{} {} {} {}\n",
                        style("File").green(),
                        path,
                        style("found with").green(),
                        style(format!("{} lines", lines)).white()
                    )?;
                    return Ok((path, content));
                }
                Err(e) => {
                    let err = ExtractorError::InputNotFound { path: path.clone() };
                    tracing::debug!("{} ({})", err, e);
                    writeln!(self.writer, "{} {}\n", path, style("not found").red())?;
                }
            }
        }
    }

    /// Re-asks until a path that does not exist yet is named.
    pub async fn prompt_output_file<S: Storage>(&mut self, storage: &S) -> Result<String> {
        loop {
            let preset = self.preset_output.take();
            let answer = self.ask("XLSX Output Filename?", preset).await?;
            let path = with_extension(&answer, OUTPUT_EXTENSION);

            if storage.exists(&path).await {
                let err = ExtractorError::OutputAlreadyExists { path: path.clone() };
                tracing::debug!("{}", err);
                writeln!(
                    self.writer,
                    "{} {}\n",
                    path,
                    style("already exists, try another name.").red()
                )?;
                continue;
            }

            writeln!(self.writer)?;
            return Ok(path);
        }
    }

    pub async fn run<L: PhoneLookup + 'static, S: Storage>(
        &mut self,
        report: &ReportWriter<L, S>,
        progress: &dyn ProgressSink,
    ) -> Result<ExportSummary> {
        let (input_path, content) = self.prompt_input_file(report.storage()).await?;
        let output_path = self.prompt_output_file(report.storage()).await?;

        let identifiers = parse_identifiers(&content);
        tracing::info!(
            "Read {} identifiers from {}, writing {}",
            identifiers.len(),
            input_path,
            output_path
        );

        writeln!(
            self.writer,
            "{} {}",
            style("[@]").magenta(),
            style("Extracting phone numbers...").magenta()
        )?;
        self.writer.flush()?;

        report.export(&identifiers, &output_path, progress).await
    }
}
