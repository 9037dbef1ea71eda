/// quick start - minimal example to get started
use amortization_engine::{generate_schedule, LoanTerms, Money, Rate};
use chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // a $10,000 personal loan over a year, paid on the 15th
    let terms = LoanTerms::builder()
        .amount(Money::from_major(10_000))
        .rate(Rate::from_percentage(8))
        .periods(12)
        .disbursement_date(NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?)
        .build()?;

    let schedule = generate_schedule(&terms, &[], &[]);

    println!("installment: ${:.2}", schedule.initial_installment);
    println!("{}", schedule.to_text());
    println!("{}", schedule.json());

    Ok(())
}
