use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Demo/live override shared by commands that translate
#[derive(ClapArgs, Debug, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct ModeArgs {
    /// Use the model (disables demo mode)
    #[arg(long)]
    pub live: bool,

    /// Answer locally without contacting the model
    #[arg(long)]
    pub demo: bool,
}

impl ModeArgs {
    /// Demo mode requested on the command line, if any
    pub fn demo_mode(&self) -> Option<bool> {
        match (self.live, self.demo) {
            (true, _) => Some(false),
            (_, true) => Some(true),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect whether text is English and translate it if not
    Translate {
        /// Text to translate (reads stdin when neither text nor --file is given)
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        #[command(flatten)]
        mode: ModeArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP translate service
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,

        #[command(flatten)]
        mode: ModeArgs,
    },

    /// Check that the configured model is available
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Output file
        #[arg(short, long, default_value = "honyaku.toml")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_translate_flags() {
        let args = Args::try_parse_from(["honyaku", "translate", "Hola", "--live", "--json"]).unwrap();
        match args.command {
            Commands::Translate { text, file, mode, json } => {
                assert_eq!(text.as_deref(), Some("Hola"));
                assert!(file.is_none());
                assert_eq!(mode.demo_mode(), Some(false));
                assert!(json);
            }
            _ => panic!("expected translate"),
        }
    }

    #[test]
    fn test_live_and_demo_conflict() {
        assert!(Args::try_parse_from(["honyaku", "serve", "--live", "--demo"]).is_err());
    }

    #[test]
    fn test_mode_defaults_to_config() {
        let args = Args::try_parse_from(["honyaku", "-v", "serve"]).unwrap();
        assert!(args.verbose);
        match args.command {
            Commands::Serve { bind, mode } => {
                assert!(bind.is_none());
                assert_eq!(mode.demo_mode(), None);
            }
            _ => panic!("expected serve"),
        }
    }
}
