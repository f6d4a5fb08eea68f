use fiber_acceptance::{FiberAcceptance, Profile, Statistic};
use ndarray::Array1;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "fiber-acceptance",
    about = "Fiber acceptance of point, disk and bulge sources"
)]
struct Opt {
    /// Path to the acceptance table `.npz` archive
    #[structopt(short, long)]
    table: String,
    /// Source profile: POINT, DISK or BULGE
    #[structopt(short, long, default_value = "POINT")]
    profile: String,
    /// Blur sigma on the focal surface [um]
    #[structopt(short, long, required = true)]
    sigma: Vec<f64>,
    /// Fiber to source offset on the focal surface [um]
    #[structopt(short, long, required = true)]
    offset: Vec<f64>,
    /// Source half light radius [arcsec]
    #[structopt(long)]
    hlradius: Vec<f64>,
    /// Returns the acceptance RMS instead of the mean
    #[structopt(long)]
    rms: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    log::debug!("{:?}", opt);

    let profile = Profile::from_name(&opt.profile)?;
    let statistic = if opt.rms {
        Statistic::Rms
    } else {
        Statistic::Mean
    };
    let fa = FiberAcceptance::from_path(&opt.table)?;

    let sigmas = Array1::from(opt.sigma);
    let offsets = Array1::from(opt.offset);
    let hlradii = Array1::from(opt.hlradius);
    let hlradii = (!hlradii.is_empty()).then(|| hlradii.view());
    let acceptance = fa.evaluate(statistic, profile, &sigmas, &offsets, hlradii)?;

    println!("{:>10} {:>10} {:>10}", "SIGMA", "OFFSET", statistic.to_string().to_uppercase());
    for ((s, o), a) in sigmas.iter().zip(&offsets).zip(&acceptance) {
        println!("{:10.3} {:10.3} {:10.6}", s, o, a);
    }
    Ok(())
}
