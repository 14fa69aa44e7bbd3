use bridgeadm::cli::Cli;
use bridgeadm::logging;
use bridgeadm::output::Output;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reset SIGPIPE handler to default (terminate) so piping to head/tail works correctly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let use_color = !cli.no_color && atty::is(atty::Stream::Stdout);
    let mut output = Output::new(use_color);

    let completed = cli.command.run(&mut output).await?;
    output.flush();

    if !completed {
        std::process::exit(1);
    }
    Ok(())
}
