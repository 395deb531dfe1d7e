use anyhow::Result;
use chrono::{DateTime, Local};
use log::{LevelFilter, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// This file contains utility functions shared by the binary, currently just
// the logger wiring.

pub struct SimpleLogger {
    log_file: Option<Mutex<std::fs::File>>,
}

impl SimpleLogger {
    pub fn new(log_file_path: Option<&str>) -> Result<Self> {
        let log_file = match log_file_path {
            Some(path) => Some(Mutex::new(
                OpenOptions::new().create(true).append(true).open(path)?,
            )),
            None => None,
        };

        Ok(SimpleLogger { log_file })
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now: DateTime<Local> = Local::now();
            let log_message = format!(
                "[{}] {} [{}] {}\n",
                now.format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            );

            if let Some(file) = &self.log_file {
                if let Ok(mut file) = file.lock() {
                    let _ = file.write_all(log_message.as_bytes());
                }
            } else {
                print!("{}", log_message);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        } else {
            let _ = std::io::stdout().flush();
        }
    }
}

pub fn setup_logging(log_file: Option<&str>, level: LevelFilter) -> Result<()> {
    let logger = SimpleLogger::new(log_file)?;
    log::set_boxed_logger(Box::new(logger)).map(|()| log::set_max_level(level))?;

    log::info!("Logging initialized at level: {}", level);

    Ok(())
}
