use super::cli_args::usage;
use super::cli_tasks::run_and_report;
use crate::Calculations::TaskKind;
use crate::settings::Settings;
use log::{error, warn};
use std::io::{self, Write};
use std::path::PathBuf;

pub fn run_interactive_menu(mut settings: Settings) {
    loop {
        show_main_menu(&settings);
        let Some(choice) = get_user_input() else {
            break;
        };

        match choice.trim() {
            "1" => run_selected(&TaskKind::ALL, &settings),
            "2" => calculations_menu(&settings),
            "3" => settings.pretty_print(),
            "4" => load_settings_file(&mut settings),
            "5" => change_output_dir(&mut settings),
            "6" => {
                settings.output.render_figures = !settings.output.render_figures;
                println!("Figures: {}", on_off(settings.output.render_figures));
            }
            "7" => println!("{}", usage()),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu(settings: &Settings) {
    println!(
        "\x1b[34m\n PeroxiKin: H2O2 consumption kinetics, field-accelerated rates\n
    and local fields at the plasma membrane \n \x1b[0m"
    );
    println!("\x1b[33m1. Run all calculations\x1b[0m");
    println!("\x1b[33m2. Run one calculation\x1b[0m");
    println!("\x1b[33m3. Show settings\x1b[0m");
    println!("\x1b[33m4. Load settings from JSON file\x1b[0m");
    println!(
        "\x1b[33m5. Change output directory (now: {})\x1b[0m",
        settings.output.dir.display()
    );
    println!(
        "\x1b[33m6. Toggle figures (now: {})\x1b[0m",
        on_off(settings.output.render_figures)
    );
    println!("\x1b[33m7. Help\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    prompt("Enter your choice: ");
}

fn calculations_menu(settings: &Settings) {
    loop {
        println!("\n=== Calculations ===");
        for (i, kind) in TaskKind::ALL.iter().enumerate() {
            println!("{}. {:<14} {}", i + 1, kind.cli_name(), kind.description());
        }
        println!("0. Back to main menu");
        prompt("Enter your choice: ");

        let Some(choice) = get_user_input() else {
            break;
        };
        match choice.trim() {
            "0" => break,
            other => match other.parse::<usize>().ok().and_then(|i| TaskKind::ALL.get(i.wrapping_sub(1))) {
                Some(kind) => run_selected(&[*kind], settings),
                None => println!("Invalid choice. Please try again."),
            },
        }
    }
}

fn run_selected(kinds: &[TaskKind], settings: &Settings) {
    if let Err(e) = run_and_report(kinds, settings) {
        error!("{}", e);
    }
}

fn load_settings_file(settings: &mut Settings) {
    prompt("Path to the JSON settings file: ");
    let Some(path) = get_user_input() else {
        return;
    };
    let path = path.trim();
    if path.is_empty() {
        return;
    }
    match Settings::from_json_file(path) {
        Ok(loaded) => {
            *settings = loaded;
            println!("Settings loaded from {}", path);
        }
        Err(e) => error!("{}", e),
    }
}

fn change_output_dir(settings: &mut Settings) {
    prompt("New output directory: ");
    let Some(dir) = get_user_input() else {
        return;
    };
    let dir = dir.trim();
    if !dir.is_empty() {
        settings.output.dir = PathBuf::from(dir);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn prompt(text: &str) {
    prompt_to(&mut io::stdout(), text);
}

fn prompt_to<W: Write>(out: &mut W, text: &str) {
    if let Err(e) = write!(out, "\x1b[36m{}\x1b[0m", text).and_then(|()| out.flush()) {
        warn!("failed to write the prompt: {}", e);
    }
}

/// None at end of input or on a read error
fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input),
        Err(e) => {
            error!("failed to read input: {}", e);
            None
        }
    }
}
