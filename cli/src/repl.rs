//! Line-oriented game loop

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use canteen_change_core::{
    CoinDenomination, Difficulty, FeedbackDispatcher, GameError, Product, SavingsGoal, Screen,
    SharedNavigator,
};

use crate::sink::TerminalSink;

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Buy(Product),
    Coin(CoinDenomination),
    Remove(usize),
    Clear,
    Check,
    Hint,
    Undo,
    Next,
    Goal(SavingsGoal),
    Go(Screen),
    Difficulty(Difficulty),
    Summary,
    Tray,
    Save,
    Reset,
    Help,
    Quit,
}

/// Parse an input line into a command
pub fn parse(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or_else(|| "empty command".to_string())?;
    let arg = parts.collect::<Vec<_>>().join(" ");

    let command = match verb.to_lowercase().as_str() {
        "buy" => Command::Buy(
            Product::find(&arg).ok_or_else(|| format!("no such product: {}", arg))?,
        ),
        "coin" | "add" => {
            let value: i64 = arg
                .parse()
                .map_err(|_| format!("not a number: {}", arg))?;
            Command::Coin(CoinDenomination::try_from(value)?)
        }
        "remove" | "rm" => Command::Remove(
            arg.parse()
                .map_err(|_| format!("not a tray position: {}", arg))?,
        ),
        "clear" => Command::Clear,
        "check" | "evaluate" => Command::Check,
        "hint" => Command::Hint,
        "undo" => Command::Undo,
        "next" | "continue" => Command::Next,
        "goal" => Command::Goal(
            SavingsGoal::find(&arg).ok_or_else(|| format!("no such goal: {}", arg))?,
        ),
        "go" => Command::Go(Screen::parse(&arg).ok_or_else(|| format!("no such screen: {}", arg))?),
        "difficulty" | "level" => Command::Difficulty(arg.parse()?),
        "summary" => Command::Summary,
        "tray" => Command::Tray,
        "save" => Command::Save,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {}", other)),
    };
    Ok(command)
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(shared: SharedNavigator) -> Result<()> {
    let mut dispatcher =
        FeedbackDispatcher::new(vec![Box::new(TerminalSink::new(std::io::stdout()))]);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    prompt(&shared).await?;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt(&shared).await?;
            continue;
        }
        match parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Err(e) = execute(&shared, command).await {
                    println!("  Not now: {}", e);
                }
            }
            Err(message) => println!("  {}", message),
        }
        let events = shared.lock().await.drain_events();
        dispatcher.dispatch_all(events);
        prompt(&shared).await?;
    }

    if let Err(e) = shared.lock().await.save() {
        warn!(error = %e, "final save failed");
    }
    Ok(())
}

async fn execute(shared: &SharedNavigator, command: Command) -> Result<(), GameError> {
    match command {
        Command::Hint => {
            // Text is printed by the sink through the HintShown event
            shared.get_hint().await?;
        }
        Command::Summary => {
            if let (Some(text), _) = shared.show_summary().await {
                println!("  {}", text);
            }
        }
        command => {
            let mut nav = shared.lock().await;
            match command {
                Command::Buy(product) => {
                    nav.buy(product)?;
                }
                Command::Coin(coin) => {
                    nav.add_coin(coin)?;
                }
                Command::Remove(position) => {
                    // positions are shown 1-based
                    nav.remove_coin(position.saturating_sub(1))?;
                }
                Command::Clear => nav.clear()?,
                Command::Check => {
                    let evaluation = nav.evaluate()?;
                    if !evaluation.is_correct() {
                        if let Some(round) = nav.round() {
                            println!(
                                "  Not yet: {} on the tray, change is {}.",
                                round.selected_total(),
                                round.change_target()
                            );
                        }
                    }
                }
                Command::Undo => {
                    nav.undo()?;
                }
                Command::Next => {
                    if nav.continue_after_correct().is_none() {
                        println!("  Finish this round first.");
                    } else if nav.screen() == Screen::Summary {
                        if let Some(text) = nav.feedback_text() {
                            println!("  {}", text);
                        }
                    }
                }
                Command::Goal(goal) => {
                    nav.select_goal(goal);
                }
                Command::Go(screen) => {
                    nav.navigate(screen);
                }
                Command::Difficulty(difficulty) => {
                    nav.set_difficulty(difficulty);
                    println!("  Difficulty: {:?}", difficulty);
                }
                Command::Tray => match nav.round() {
                    Some(round) => {
                        let coins: Vec<String> =
                            round.coins().iter().map(|c| c.to_string()).collect();
                        println!(
                            "  Tray [{}] = {} of {}",
                            coins.join(", "),
                            round.selected_total(),
                            round.change_target()
                        );
                    }
                    None => println!("  No open round. Buy something first."),
                },
                Command::Save => nav.save()?,
                Command::Reset => nav.reset(),
                Command::Help => print_help(),
                Command::Hint | Command::Summary | Command::Quit => {}
            }
        }
    }
    Ok(())
}

async fn prompt(shared: &SharedNavigator) -> Result<()> {
    let nav = shared.lock().await;
    print!("{} | budget {} > ", nav.screen(), nav.ledger().budget());
    std::io::stdout().flush()?;
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  buy <product>      buy from the menu (e.g. buy simit)");
    println!("  coin <1|5|10|20>   put a coin on the change tray");
    println!("  remove <n>         take the n-th coin off the tray");
    println!("  clear | tray       empty / show the tray");
    println!("  check              check the change");
    println!("  hint               ask for a hint");
    println!("  next               leave a solved round");
    println!("  undo               return the last purchase");
    println!("  goal <id>          pick a savings goal");
    println!("  difficulty <lvl>   easy, medium or hard");
    println!("  go <screen>        switch screen");
    println!("  summary | save | reset | quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_buy_by_either_name() {
        assert_eq!(
            parse("buy simit"),
            Ok(Command::Buy(Product::find("Simit").unwrap()))
        );
        assert_eq!(
            parse("buy Grilled Sandwich"),
            Ok(Command::Buy(Product::find("Tost").unwrap()))
        );
        assert!(parse("buy pizza").is_err());
    }

    #[test]
    fn test_parse_coin_values() {
        assert_eq!(parse("coin 20"), Ok(Command::Coin(CoinDenomination::Twenty)));
        assert!(parse("coin 2").is_err());
        assert!(parse("coin lots").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("  CHECK "), Ok(Command::Check));
        assert_eq!(parse("remove 2"), Ok(Command::Remove(2)));
        assert_eq!(parse("go coin_intro"), Ok(Command::Go(Screen::CoinIntro)));
        assert_eq!(
            parse("difficulty hard"),
            Ok(Command::Difficulty(Difficulty::Hard))
        );
        assert!(parse("dance").is_err());
        assert!(parse("").is_err());
    }
}
