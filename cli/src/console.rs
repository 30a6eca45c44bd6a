use std::io::{self, IsTerminal, Write};

use tinybench_core::{
    report::{Report, ReportFormat},
    sampler::Progress,
};

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Human-facing output. With a machine-readable format the chatter moves to
/// stderr so stdout carries only the report.
pub(crate) struct Console {
    chatter: Box<dyn Write>,
    format: ReportFormat,
}

impl Console {
    pub(crate) fn new(format: ReportFormat) -> Self {
        let chatter: Box<dyn Write> = match format {
            ReportFormat::Table => Box::new(io::stdout()),
            ReportFormat::Json | ReportFormat::Yaml => Box::new(io::stderr()),
        };
        Self { chatter, format }
    }

    #[cfg(test)]
    pub(crate) fn format(&self) -> ReportFormat {
        self.format
    }

    pub(crate) fn welcome(&mut self, clear: bool) -> io::Result<()> {
        if clear && self.format == ReportFormat::Table && io::stdout().is_terminal() {
            write!(self.chatter, "{CLEAR_SCREEN}")?;
        }
        writeln!(
            self.chatter,
            "\n Welcome to tinybench, a tiny tool for benchmarking script code"
        )
    }

    pub(crate) fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.chatter, "{text}")
    }

    pub(crate) fn announce_case(&mut self, index: usize, body: &str) -> io::Result<()> {
        let indented = body.trim_end().replace('\n', "\n\t");
        write!(
            self.chatter,
            "\n Found benchmark {index}:\n\n\t```\n\t{indented}\n\t```\n\n"
        )
    }

    pub(crate) fn announce_builtin(&mut self, index: usize, title: &str) -> io::Result<()> {
        write!(self.chatter, "\n Found benchmark {index}: {title}\n\n")
    }

    pub(crate) fn executing(&mut self, index: usize) -> io::Result<()> {
        write!(self.chatter, " Executing benchmark {index}")?;
        self.chatter.flush()
    }

    // Progress is best-effort; a closed terminal must not abort the run.
    pub(crate) fn progress(&mut self, progress: Progress) {
        if let Progress::Tick { .. } = progress {
            let _ = write!(self.chatter, ".");
            let _ = self.chatter.flush();
        }
    }

    pub(crate) fn done(&mut self) -> io::Result<()> {
        writeln!(self.chatter, " done!")
    }

    pub(crate) fn results(&mut self, report: &Report) -> anyhow::Result<()> {
        match self.format {
            ReportFormat::Table => {
                writeln!(self.chatter, "\n Results")?;
                write!(self.chatter, "{}", report.render_table())?;
                self.chatter.flush()?;
            }
            format => {
                self.chatter.flush()?;
                let rendered = report.render(format)?;
                let mut out = io::stdout().lock();
                writeln!(out, "{}", rendered.trim_end())?;
            }
        }
        Ok(())
    }
}
