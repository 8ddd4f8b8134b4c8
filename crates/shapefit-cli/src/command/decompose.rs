use shapefit_features::{FeatureKey, decompose};

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DecomposeArg {
    /// FEN (only the piece placement field is used)
    position: String,
    /// Read the position as `/`-separated rows with `.` for blank cells
    #[arg(long)]
    plain: bool,
    /// Also draw each feature as a grid
    #[arg(long)]
    grid: bool,
}

pub(crate) fn run(arg: &DecomposeArg) -> anyhow::Result<()> {
    let DecomposeArg {
        position,
        plain,
        grid,
    } = arg;
    let board = util::parse_position(position, *plain)?;

    eprintln!("Board ({}x{}):", board.width(), board.height());
    for line in board.to_string().lines() {
        eprintln!("  {line}");
    }

    let features = decompose::decompose(&board);
    eprintln!(
        "{} features ({} regions, full board and blank regions skipped)",
        features.len(),
        decompose::region_count(board.width(), board.height())
    );
    for feature in &features {
        // keys spell blanks as spaces, so quote them
        println!("{:?}", FeatureKey::from_feature(feature).to_string());
        if *grid {
            for line in feature.to_string().lines() {
                println!("    {line}");
            }
        }
    }

    Ok(())
}
