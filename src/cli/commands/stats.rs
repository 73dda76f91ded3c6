use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_store;
use crate::db::stats::statistics;
use crate::errors::AppResult;
use crate::models::Category;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, RESET, color_for_category};
use crate::utils::time::minutes_to_decimal;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Stats) {
        let repo = open_store(cfg)?;
        let stats = statistics(&repo)?;

        header("Statistics");
        println!("{}• Reports:{} {}", CYAN, RESET, stats.total_reports);
        println!("{}• Total hours:{} {:.2}", CYAN, RESET, stats.total_hours());

        println!("{}• By category:{}", CYAN, RESET);
        for c in Category::ALL {
            println!(
                "    {}{:<9}{} {:>3} days  {:>8.2} h",
                color_for_category(c),
                c,
                RESET,
                stats.days_for(c),
                stats.hours_for(c)
            );
        }

        if !stats.minutes_by_year.is_empty() {
            println!("{}• By year:{}", CYAN, RESET);
            for (year, minutes) in &stats.minutes_by_year {
                println!("    {}  {:>8.2} h", year, minutes_to_decimal(*minutes));
            }
        }
        println!();
    }

    Ok(())
}
