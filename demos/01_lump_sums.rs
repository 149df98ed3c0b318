/// comparing a standard loan against extra repayments and lump sums
use amortization_rs::chrono::NaiveDate;
use amortization_rs::views::format::{currency, duration};
use amortization_rs::{Chart, LoanConfig, LoanCollection};

const CONFIG: &str = r#"{
    "name": "extra repayments",
    "principal": 300000,
    "annual_rate_percent": 4.5,
    "term_months": 360,
    "extra_repayment": 200,
    "start_date": "2024-01-01",
    "lump_sums": [
        { "date": "2029-01-01", "amount": 50000 },
        { "date": "2026-06-01", "amount": 10000 }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let comparison = LoanConfig::from_json(CONFIG)?;

    // same loan without any extras
    let mut standard = comparison.clone();
    standard.name = "standard".to_string();
    standard.extra_repayment = 0.0;
    standard.lump_sums.clear();

    let mut loans = LoanCollection::new();
    loans.push(standard.build()?);
    loans.push(comparison.build()?);

    let end = loans.get(1).ok_or("missing loan")?.end_date()?;
    println!("new end date:     {}", end);
    println!("interest savings: {}", currency(loans.interest_savings(1)?));
    println!("time savings:     {}", duration(loans.time_savings(1)?));

    let chart = Chart::from_collection(&loans)?;
    for series in &chart.series {
        println!("{}", series.name);
        for (label, point) in chart.labels.iter().zip(&series.points) {
            println!("  {} {:>4} {:>14}", label, point.x, currency(point.y));
        }
    }

    let halfway = NaiveDate::from_ymd_opt(2039, 1, 1).ok_or("bad date")?;
    for loan in &loans {
        println!("{} owes {} on {}", loan.name(), currency(loan.amount_owing_at_date(halfway)), halfway);
    }

    Ok(())
}
