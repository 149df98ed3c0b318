/// quick start - a 30 year mortgage and what it costs
use amortization_rs::chrono::NaiveDate;
use amortization_rs::views::format::{currency, duration};
use amortization_rs::{LoanBuilder, LoanSummary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // $300,000 at 4.5% over 30 years, repayment derived from the term
    let loan = LoanBuilder::new()
        .name("mortgage")
        .principal(300_000.0)
        .annual_rate(4.5)
        .term_months(360)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?)
        .build()?;

    println!("repayment:      {}", currency(loan.repayment()));
    println!("paid off after: {}", duration(i64::from(loan.periods_to_zero()?)));
    println!("total interest: {}", currency(loan.total_interest()?));
    println!("{}", LoanSummary::from_loan(&loan)?.to_json_pretty());

    Ok(())
}
