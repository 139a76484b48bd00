use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use splitteur::{
    ExpenseRequest, Member, Participant, add_expense, add_member, create_group, initialize_db,
};

/// A utility for creating a test database for the splitteur server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
///
/// The database has one group, "Flatmates", shared by the users `alice`,
/// `bob` and `carol`, with a few expenses between them.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test group...");

    let members = [("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")].map(|(id, name)| {
        Member {
            user_id: id.to_owned(),
            name: name.to_owned(),
        }
    });
    let group = create_group("Flatmates", &members[0], &conn)?;

    for member in &members[1..] {
        add_member(group.id, member, &conn)?;
    }

    println!("Creating test expenses...");

    let participants = |ids: &[usize]| -> Vec<Participant> {
        ids.iter()
            .map(|&index| Participant {
                id: members[index].user_id.clone(),
                name: members[index].name.clone(),
            })
            .collect()
    };

    let expenses = [
        (0, 120.0, "Groceries", 100.0, participants(&[0, 1, 2])),
        (1, 90.0, "Internet", 100.0, participants(&[0, 1, 2])),
        (2, 45.5, "Takeaways", 50.0, participants(&[0, 2])),
        (0, 30.0, "Cleaning supplies", 100.0, participants(&[1])),
    ];

    for (payer, amount, description, split_percentage, participants) in expenses {
        add_expense(
            &ExpenseRequest {
                amount,
                description: description.to_owned(),
                group_id: group.id,
                split_percentage,
                participants,
                created_by: members[payer].user_id.clone(),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
