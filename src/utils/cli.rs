use std::io;

/// One line of console input, parsed.
pub enum Command {
    Position(String),                  // position <placement>
    StartPos,                          // startpos
    Clear,                             // clear
    Place(String, char),               // place <square> <letter>
    Remove(String),                    // remove <square>
    Random(String),                    // random <count>
    Show,                              // show the current board
    Coverage(Option<String>),          // coverage <maybe depth>
    Attackers(String, Option<String>), // attackers <square> <maybe depth>
    Depth(String),                     // depth <1|2|3>
    Fen,                               // print the placement string
    Quit,                              // quit the program

    Invalid(String), // placeholder for invalid commands so we can pattern match
}

impl Command {
    pub fn receive() -> Command {
        let mut input = String::new();

        io::stdin()
            .read_line(&mut input)
            .expect("Failed to read line");

        let parts = input.as_str().trim().split_whitespace().collect::<Vec<_>>();

        match parts.as_slice() {
            ["position", placement] => Command::Position(placement.to_string()),
            ["startpos"] => Command::StartPos,
            ["clear"] => Command::Clear,
            ["place", square, letter] if letter.chars().count() == 1 => {
                Command::Place(square.to_string(), letter.chars().next().unwrap_or(' '))
            }
            ["remove", square] => Command::Remove(square.to_string()),
            ["random", count] => Command::Random(count.to_string()),
            ["show"] => Command::Show,
            ["coverage"] => Command::Coverage(None),
            ["coverage", depth] => Command::Coverage(Some(depth.to_string())),
            ["attackers", square] => Command::Attackers(square.to_string(), None),
            ["attackers", square, depth] => {
                Command::Attackers(square.to_string(), Some(depth.to_string()))
            }
            ["depth", depth] => Command::Depth(depth.to_string()),
            ["fen"] => Command::Fen,
            ["quit"] | ["exit"] => Command::Quit,
            _ => Command::Invalid(input),
        }
    }
}
