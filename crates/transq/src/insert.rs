//! Manual-insert flow: one date, a batch of request numbers.

use miette::Result;

use transq_control::{
    Config, ControlError, ControlStore, RequestId, ScheduleDate, validate_date,
};

use crate::prompt;

/// Prompt for a schedule date and request numbers, then add the batch.
///
/// The date is re-prompted until it is well-formed and strictly in the
/// future; if input ends first the flow fails instead of looping. Request
/// numbers are collected until an empty line or end of input. Every add
/// prints its own outcome immediately and the flow ends with an error
/// count, so one rejected request never stops the batch.
pub fn run(config: &Config, today: ScheduleDate) -> Result<()> {
    let store = ControlStore::new(config);

    let date = loop {
        let Some(text) = prompt("Date to insert in the queue (DD/MM/YYYY):") else {
            return Err(miette::miette!("input ended before a valid date was entered"));
        };
        if validate_date(&text, today) {
            break ScheduleDate::parse(&text).map_err(|e| miette::miette!("{}", e))?;
        }
        println!("Invalid date: must be DD/MM/YYYY and after today.");
    };

    let mut requests = Vec::new();
    loop {
        // End of input finishes the batch the same way an empty line does.
        let Some(text) = prompt("Request number (empty line to finish):") else {
            break;
        };
        if text.is_empty() {
            break;
        }
        requests.push(text);
    }

    println!("Adding requests to the control file...");
    let mut errors = 0;
    for text in &requests {
        match add_one(&store, text, date) {
            Ok(request) => {
                println!("Request {} added to control file.", request);
            }
            Err(ControlError::Duplicate(request)) => {
                println!("ERROR, request {} already in control file.", request);
                errors += 1;
            }
            Err(ControlError::MissingCofile { request, .. }) => {
                println!(
                    "ERROR in cofile. Is the request released? Request {} not added to control file.",
                    request
                );
                errors += 1;
            }
            Err(ControlError::InvalidRequest(text)) => {
                println!("ERROR, {:?} is not a valid request number.", text);
                errors += 1;
            }
            Err(error) => return Err(miette::miette!("{}", error)),
        }
    }
    println!("Finished with {} errors.", errors);
    Ok(())
}

fn add_one(
    store: &ControlStore,
    text: &str,
    date: ScheduleDate,
) -> Result<RequestId, ControlError> {
    let request = RequestId::parse(text)?;
    store.add(&request, date)?;
    Ok(request)
}
