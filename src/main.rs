use chesscope::controller::BoardController;
use chesscope::game::CoverageDepth;
use chesscope::utils::Command;
use clap::Parser;

#[derive(Parser)]
#[command(name = "chesscope")]
#[command(about = "Square coverage explorer for arbitrary chess placements", long_about = None)]
struct Cli {
    /// FEN-style piece placement field to start from
    /// (defaults to the standard starting position)
    #[arg(short, long, value_name = "PLACEMENT")]
    position: Option<String>,

    /// Coverage depth, 1-3
    #[arg(short, long, default_value_t = 1)]
    depth: usize,

    /// Print the coverage grids for the startup position and exit
    #[arg(long)]
    coverage: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut controller = BoardController::new();

    match CoverageDepth::from_repr(cli.depth) {
        Some(depth) => controller.depth = depth,
        None => {
            eprintln!("Invalid depth {}: expected 1, 2 or 3", cli.depth);
            std::process::exit(1);
        }
    }

    match &cli.position {
        Some(placement) => {
            if let Err(error) = controller.set_position(placement) {
                eprintln!("{}", error);
                std::process::exit(1);
            }
        }
        None => controller.set_startpos(),
    }

    if cli.coverage {
        controller.print_coverage(None);
        return;
    }

    println!("chesscope {}", env!("GIT_HASH"));

    loop {
        match Command::receive() {
            Command::Position(placement) => match controller.set_position(&placement) {
                Ok(()) => controller.print_board(None),
                Err(error) => log::warn!("{}", error),
            },
            Command::StartPos => {
                controller.set_startpos();
                controller.print_board(None);
            }
            Command::Clear => controller.clear_board(),
            Command::Place(square, letter) => controller.place_piece(&square, letter),
            Command::Remove(square) => controller.remove_piece(&square),
            Command::Random(count) => match count.parse::<usize>() {
                Ok(count) => {
                    controller.random_scatter(count);
                    controller.print_board(None);
                }
                Err(_) => log::warn!("Invalid piece count: {}", count),
            },
            Command::Show => controller.print_board(None),
            Command::Coverage(depth) => match depth {
                None => controller.print_coverage(None),
                Some(string) => match CoverageDepth::parse(&string) {
                    Some(depth) => controller.print_coverage(Some(depth)),
                    None => log::warn!("Invalid depth: {}", string),
                },
            },
            Command::Attackers(square, depth) => match depth {
                None => controller.print_attackers(&square, None),
                Some(string) => match CoverageDepth::parse(&string) {
                    Some(depth) => controller.print_attackers(&square, Some(depth)),
                    None => log::warn!("Invalid depth: {}", string),
                },
            },
            Command::Depth(string) => match CoverageDepth::parse(&string) {
                Some(depth) => controller.depth = depth,
                None => log::warn!("Invalid depth: {}", string),
            },
            Command::Fen => controller.print_placement(),
            Command::Quit => break,
            Command::Invalid(input) => log::warn!("Unknown command: {}", input.trim()),
        }
    }
}
