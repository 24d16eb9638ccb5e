//! Sample modular input streaming random numbers between `min` and `max`.
//!
//! ```text
//! random_numbers --scheme
//! random_numbers --validate-arguments < validation.xml
//! random_numbers < input.xml
//! ```

use std::time::Duration;

use modinput::{
    Argument, BoxError, DataType, Event, EventWriter, InputDefinition, ModularInput, Scheme,
    Validation, ValidationOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: i64 = 10;

struct RandomNumbers;

fn required_f64(input: &InputDefinition, name: &str) -> Result<f64, BoxError> {
    let parameter = input
        .parameter(name)
        .ok_or_else(|| format!("stanza '{}' has no '{name}' parameter", input.name))?;
    Ok(parameter.to_f64()?)
}

#[async_trait::async_trait]
impl ModularInput for RandomNumbers {
    fn scheme(&self) -> Scheme {
        Scheme::new("Random numbers")
            .with_description("Generate random numbers in a half-open range")
            .add_argument(
                Argument::new("min")
                    .with_description("Lower bound (inclusive)")
                    .with_data_type(DataType::Number)
                    .required_on_create(true),
            )
            .add_argument(
                Argument::new("max")
                    .with_description("Upper bound (exclusive)")
                    .with_data_type(DataType::Number)
                    .required_on_create(true),
            )
            .add_argument(
                Argument::new("count")
                    .with_description("Number of events to generate per run")
                    .with_data_type(DataType::Number)
                    .with_validation("is_pos_int('count')")
                    .with_validation_delegate(|p| match p.to_i64() {
                        Ok(n) if n > 0 => ValidationOutcome::Accepted,
                        _ => ValidationOutcome::reject("count must be a positive integer."),
                    }),
            )
            .add_argument(
                Argument::new("interval_ms")
                    .with_description("Pause between two events, in milliseconds")
                    .with_data_type(DataType::Number),
            )
    }

    async fn validate(&self, validation: &Validation) -> Result<ValidationOutcome, BoxError> {
        let bound = |name: &str| -> Result<f64, BoxError> {
            let parameter = validation
                .parameter(name)
                .ok_or_else(|| format!("missing '{name}' parameter"))?;
            Ok(parameter.to_f64()?)
        };
        if bound("min")? < bound("max")? {
            Ok(ValidationOutcome::Accepted)
        } else {
            Ok(ValidationOutcome::reject("min must be less than max."))
        }
    }

    async fn stream_events(&self, input: InputDefinition, writer: EventWriter) -> Result<(), BoxError> {
        let min = required_f64(&input, "min")?;
        let max = required_f64(&input, "max")?;
        if min >= max {
            return Err(format!("stanza '{}': min must be less than max", input.name).into());
        }
        let count = match input.parameter("count") {
            Some(p) => p.to_i64()?,
            None => DEFAULT_COUNT,
        };
        let interval = match input.parameter("interval_ms") {
            Some(p) => Duration::from_millis(p.to_i64()?.max(0) as u64),
            None => Duration::ZERO,
        };

        let mut rng = StdRng::from_entropy();
        for _ in 0..count {
            if writer.is_stopped() {
                break;
            }
            let number: f64 = rng.gen_range(min..max);
            let event = Event::new(format!("number={number}"))
                .with_stanza(input.name.clone())
                .with_source_type("random_numbers")
                .with_time(chrono::Utc::now());
            writer.queue_event(event).await?;
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(modinput::run_blocking(RandomNumbers));
}
