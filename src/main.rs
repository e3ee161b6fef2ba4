use clap::Parser;
use miette::Result;
use sender_contract::cli::commands;
use sender_contract::cli::{init_logging, Cli, Commands};
use sender_contract::core::Config;

fn main() -> Result<()> {
    // Terminate quietly on a closed pipe (`tplcheck ... | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    let config = Config::load();
    init_logging(&global, &config);

    match cli.command {
        Commands::Validate(args) => commands::validate::run(args, &global, &config),
        Commands::Normalize(args) => commands::normalize::run(args, &global, &config),
        Commands::Schema(cmd) => commands::schema::run(cmd, &global),
        Commands::Config(cmd) => commands::config::run(cmd, &global, &config),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
