/// extra repayments - how unscheduled payments shorten and cheapen a loan
use amortization_engine::{
    generate_schedule, ExtraRepayment, LoanTerms, Money, Rate, SafeTimeProvider, TimeSource,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== extra repayments example ===\n");

    // fixed clock so dates that fail to parse resolve deterministically
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));

    let terms = LoanTerms::builder()
        .amount(Money::from_major(120_000))
        .rate(Rate::from_percentage(5))
        .periods(12)
        .build_with_time(&time)?;

    let baseline = generate_schedule(&terms, &[], &[]);

    // raw inputs as they might arrive from a form
    let extras = vec![
        ExtraRepayment::from_fields("2024-07-15", "20000", &time)?,
        ExtraRepayment::from_fields("2024/10/03", "5000.50", &time)?,
    ];
    let schedule = generate_schedule(&terms, &extras, &[]);

    println!("{}", schedule.to_text());

    let saved = schedule.summary().interest_saved_against(&baseline.summary());
    println!("baseline interest: ${:.2}", baseline.total_interest());
    println!("interest with extras: ${:.2}", schedule.total_interest());
    println!("interest saved: ${:.2}", saved);

    // paying more than is owed ends the schedule early
    let payoff = vec![ExtraRepayment::new(
        chrono::NaiveDate::from_ymd_opt(2024, 4, 10).ok_or("bad date")?,
        Money::from_major(200_000),
    )];
    let early = generate_schedule(&terms, &payoff, &[]);
    println!("\npaid off on {:?} after {} rows", early.payoff_date(), early.len());

    Ok(())
}
