/// rate changes - repricing a variable-rate loan and inspecting the event log
use amortization_engine::{
    Event, LoanTerms, Money, Rate, RateChange, ScheduleConfig, ScheduleEngine,
};
use chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== rate changes example ===\n");

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date");

    let terms = LoanTerms::new(
        Money::from_major(120_000),
        Rate::from_percentage(5),
        date(2024, 1, 1)?,
        date(2024, 2, 1)?,
        None,
        12,
    );

    let rate_changes = vec![
        RateChange::new(date(2024, 5, 1)?, Rate::from_percentage(10)),
        RateChange::new(date(2024, 9, 15)?, Rate::from_bps(750)),
    ];

    // engine constants can be loaded from json
    let config = ScheduleConfig::from_json(r#"{ "payoff_snap_threshold": "0.05" }"#)?;
    let engine = ScheduleEngine::new(config)?;
    let schedule = engine.generate(&terms, &[], &rate_changes);

    println!("{}", schedule.to_text());

    for event in schedule.events() {
        match event {
            Event::InterestRateChanged { date, old_rate, new_rate, .. } => {
                println!("{}: rate {} -> {}", date, old_rate, new_rate);
            }
            Event::InstallmentRecalculated { period, old_installment, new_installment, .. } => {
                println!(
                    "period {}: installment ${:.2} -> ${:.2}",
                    period, old_installment, new_installment
                );
            }
            _ => {}
        }
    }

    Ok(())
}
