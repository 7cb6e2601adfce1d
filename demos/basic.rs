//! Basic example of using the Lights Out search strategies

use lightsout_core::{GridState, MctsConfig, Position, Scrambler, Solver, Strategy};

fn main() -> lightsout_core::Result<()> {
    // Scramble a board
    println!("Scrambling a 4x4 board...\n");
    let mut scrambler = Scrambler::with_seed(42);
    let board = scrambler.scramble(4)?;

    println!("Scrambled board:");
    println!("{}", board);
    println!("Lights on: {}", board.lights_on());
    println!("At least {} presses needed\n", board.press_lower_bound());

    // Solve it with every strategy
    let solver = Solver::new().with_mcts(MctsConfig::default().with_iterations(2000).with_seed(42));
    for &strategy in Strategy::all() {
        let report = solver.solve(strategy, &board)?;
        println!(
            "{:<6} {} ({} expanded, {} generated)",
            strategy, report.outcome, report.expanded, report.generated
        );
    }

    // Press cells by hand
    println!("\n--- Pressing cells by hand ---\n");
    let board: GridState = "010/111/010".parse()?;
    println!("Parsed board:");
    println!("{}", board);

    let pressed = board.toggle(Position::new(1, 1))?;
    println!("After pressing {}:", Position::new(1, 1));
    println!("{}", pressed);
    println!("Solved: {}", pressed.is_terminal());

    Ok(())
}
