use beautify::passes::PassId;
use beautify::Pipeline;

pub fn cmd_passes() {
    for id in PassId::ALL {
        let mut flags = Vec::new();
        if id.requires_depth() {
            flags.push("needs depth");
        }
        if id.invalidates_depth() {
            flags.push("invalidates depth");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!("{:<24} {}{}", id.name(), id.description(), flags);
    }

    let order: Vec<&str> = Pipeline::default_order()
        .passes()
        .iter()
        .map(|id| id.name())
        .collect();
    println!("\ndefault order: {}", order.join(","));
}
