// generates man page from clap CLI definition
// outputs to man/rulekit.1, plus one page per subcommand

use clap::CommandFactory;
use clap_mangen::Man;
use rulekit::cli::Cli;

fn main() -> std::io::Result<()> {
    let cmd = Cli::command();
    std::fs::create_dir_all("man")?;

    render(cmd.clone(), "man/rulekit.1")?;
    for sub in cmd.get_subcommands() {
        let name = format!("rulekit-{}", sub.get_name());
        let page = sub.clone().name(name.clone());
        render(page, &format!("man/{}.1", name))?;
    }

    println!("Generated man pages in man/");
    Ok(())
}

fn render(cmd: clap::Command, path: &str) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    Man::new(cmd).render(&mut buffer)?;
    std::fs::write(path, buffer)
}
