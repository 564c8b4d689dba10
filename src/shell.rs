//! Interactive menu
//!
//! Reads free-text answers line by line and dispatches to the inventory
//! operations. Both streams are injected so the loop can run against a
//! terminal or against in-memory buffers.

use crate::error::{ErrorCategory, ErrorKind, InventoryError, Result};
use crate::inventory::Inventory;
use crate::record::{ItemUpdate, Record};
use std::io::{BufRead, Write};
use tracing::debug;

const MENU: &str = "\nWarehouse Inventory Management
1. Add Item
2. Remove Item
3. Update Item
4. View All Items
5. Get Full Report
6. Get Expired Items
7. Search for an Item
q. Exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Update,
    ViewAll,
    FullReport,
    ExpiredItems,
    Search,
    Quit,
}

impl MenuChoice {
    /// Map a raw answer to a menu entry. Answers are matched exactly.
    pub fn parse(answer: &str) -> Option<Self> {
        match answer {
            "1" => Some(Self::Add),
            "2" => Some(Self::Remove),
            "3" => Some(Self::Update),
            "4" => Some(Self::ViewAll),
            "5" => Some(Self::FullReport),
            "6" => Some(Self::ExpiredItems),
            "7" => Some(Self::Search),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Print every record in its raw form, one per line, in storage order.
pub fn write_raw(out: &mut dyn Write, records: &[Record]) -> Result<()> {
    for record in records {
        writeln!(out, "{:?}", record).map_err(InventoryError::output)?;
    }
    Ok(())
}

pub struct Shell<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run the menu loop until the user quits or input ends.
    ///
    /// Operation failures (I/O, malformed dates) end the loop and are
    /// returned to the caller.
    pub fn run(&mut self, inventory: &mut Inventory) -> Result<()> {
        loop {
            self.out
                .write_all(MENU.as_bytes())
                .map_err(InventoryError::output)?;
            let Some(answer) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            let Some(choice) = MenuChoice::parse(&answer) else {
                writeln!(self.out, "Invalid choice. Please try again.")
                    .map_err(InventoryError::output)?;
                continue;
            };
            debug!(?choice, "menu choice");

            if choice == MenuChoice::Quit || !self.dispatch(choice, inventory)? {
                return Ok(());
            }
        }
    }

    /// Handle one menu entry. Returns false when input ran out mid-way.
    fn dispatch(&mut self, choice: MenuChoice, inventory: &mut Inventory) -> Result<bool> {
        match choice {
            MenuChoice::Add => {
                let Some(answers) = self.prompt_all(&[
                    "Enter item name: ",
                    "Enter quantity: ",
                    "Enter expiration date (YYYY-MM-DD): ",
                    "Enter price: ",
                ])?
                else {
                    return Ok(false);
                };
                let [item, quantity, expiration_date, price] = answers;
                let record = Record::new(item, quantity, expiration_date, price);
                inventory.add_item(&mut self.out, record)?;
            }
            MenuChoice::Remove => {
                let Some(item) = self.prompt("Enter item name to remove: ")? else {
                    return Ok(false);
                };
                inventory.remove_item(&mut self.out, &item)?;
            }
            MenuChoice::Update => {
                let Some(answers) = self.prompt_all(&[
                    "Enter item name to update: ",
                    "Enter new quantity (leave blank to keep current): ",
                    "Enter new expiration date (YYYY-MM-DD, leave blank to keep current): ",
                    "Enter new price (leave blank to keep current): ",
                ])?
                else {
                    return Ok(false);
                };
                let [item, quantity, expiration_date, price] = answers;
                let update = ItemUpdate::from_inputs(&quantity, &expiration_date, &price);
                inventory.update_item(&mut self.out, &item, &update)?;
            }
            MenuChoice::ViewAll => write_raw(&mut self.out, inventory.records())?,
            MenuChoice::FullReport => {
                inventory.full_report(&mut self.out)?;
            }
            MenuChoice::ExpiredItems => {
                inventory.expired_items(&mut self.out)?;
            }
            MenuChoice::Search => {
                let Some(item) = self.prompt("Enter the name of the item to search for: ")? else {
                    return Ok(false);
                };
                inventory.search_item(&mut self.out, &item)?;
            }
            MenuChoice::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn prompt_all<const N: usize>(&mut self, prompts: &[&str; N]) -> Result<Option<[String; N]>> {
        let mut answers: [String; N] = std::array::from_fn(|_| String::new());
        for (answer, prompt) in answers.iter_mut().zip(prompts) {
            match self.prompt(prompt)? {
                Some(line) => *answer = line,
                None => return Ok(None),
            }
        }
        Ok(Some(answers))
    }

    /// Print `prompt` and read one line. Returns `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt).map_err(InventoryError::output)?;
        self.out.flush().map_err(InventoryError::output)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|e| {
            InventoryError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to read input",
                e,
            )
        })?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
