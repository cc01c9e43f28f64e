use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;
use advdiff3::config::ProblemConfig;
use advdiff3::exact;
use advdiff3::field::Field;
use advdiff3::grid::Grid;
use advdiff3::limiter::Limiter;
use advdiff3::meshing;
use advdiff3::problem::ProblemKind;
use advdiff3::subdomain;




#[derive(Debug, Parser)]
#[clap(version = "0.1", author = "J. Zrake <jzrake@clemson.edu>")]
struct Opts {
    /// Diffusivity; must be positive
    #[clap(long, default_value = "1.0")]
    eps: f64,

    /// Strength of the wind
    #[clap(long, default_value = "1.0")]
    w0: f64,

    /// Flux limiter: none|centered|vanleer
    #[clap(long, default_value = "centered")]
    limiter: Limiter,

    /// Problem variant: layer|glaze
    #[clap(long, default_value = "layer")]
    problem: ProblemKind,

    #[clap(long, default_value = "6")]
    mx: i64,

    #[clap(long, default_value = "6")]
    my: i64,

    /// Periodic grid size; 6 without a limiter, 5 with one
    #[clap(long)]
    mz: Option<i64>,

    /// Number of times to double the resolution
    #[clap(long, default_value = "0")]
    refine: u32,

    /// Number of subdomains along each axis, as bx,by,bz
    #[clap(long, default_value = "1,1,1", parse(try_from_str = parse_blocks))]
    blocks: (usize, usize, usize),

    /// Size of the Rayon pool; subdomains are processed in serial below 2
    #[clap(short = 't', long, default_value = "1")]
    threads: usize,

    /// Write the report and residual to this file as CBOR
    #[clap(short = 'o', long)]
    output: Option<String>,
}




#[derive(serde::Serialize)]
struct Report {
    grid: Grid,
    cell_spacing: (f64, f64, f64),
    config: ProblemConfig,
    residual_norm: f64,
    error_norm: Option<f64>,
    residual: Field,
}




// ============================================================================
fn parse_blocks(arg: &str) -> Result<(usize, usize, usize), String> {
    let parts = arg
        .split(',')
        .map(|s| s.trim().parse::<usize>().map_err(|e| format!("{}: {}", s, e)))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        &[bx, by, bz] => Ok((bx, by, bz)),
        _ => Err(format!("expected bx,by,bz, got '{}'", arg)),
    }
}




// ============================================================================
fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new().with_level(log::LevelFilter::Info).init()?;

    let opts = Opts::parse();
    let config = ProblemConfig::new(opts.eps, opts.w0, opts.limiter, opts.problem)?;
    let default_mz = if config.limiter().is_active() { 5 } else { 6 };
    let grid = Grid::new(opts.mx, opts.my, opts.mz.unwrap_or(default_mz))?.refine(opts.refine);
    let blocks = meshing::decompose(&grid, opts.blocks)?;
    let (mx, my, mz) = grid.size();
    let (hx, hy, hz) = grid.cell_spacing();

    info!("{:?}", config);
    info!("{} subdomains on {} x {} x {} grid", blocks.len(), mx, my, mz);

    let pool = if opts.threads >= 2 {
        Some(rayon::ThreadPoolBuilder::new().num_threads(opts.threads).build()?)
    } else {
        None
    };

    let initial = Field::zeros(grid.index_space());
    let problem = config.problem();
    let trial = match problem.exact() {
        Some(exact) => exact.sample(&grid, grid.index_space()),
        None => initial.clone(),
    };

    let start = std::time::Instant::now();
    let residual = subdomain::global_residual(grid, config, &trial, &blocks, pool.as_ref())?;
    info!("residual assembled in {:.4}s", start.elapsed().as_secs_f64());

    let residual_norm = exact::discrete_norm(&grid, residual.data().iter().cloned());
    let error_norm = problem
        .exact()
        .map(|_| exact::error_norm(&grid, &initial, &trial, &grid.index_space()));

    println!(
        "done on {} x {} x {} grid, cell dims {:.4} x {:.4} x {:.4}, eps={}, limiter = {}:",
        mx, my, mz, hx, hy, hz, config.eps(), config.limiter());
    println!("  problem {}, w0={}", config.problem_kind(), config.w0());

    match error_norm {
        Some(err) => {
            println!("  residual |F(uexact)|_{{2,h}} = {:.4e}", residual_norm);
            println!("  initial error |u0-uexact|_{{2,h}} = {:.4e} (u0 = 0, no solve)", err);
        }
        None => {
            println!("  residual |F(u)|_{{2,h}} = {:.4e}", residual_norm);
        }
    }

    if let Some(filename) = opts.output {
        let report = Report {
            grid,
            cell_spacing: (hx, hy, hz),
            config,
            residual_norm,
            error_norm,
            residual,
        };
        let file = std::fs::File::create(&filename)?;
        let mut buffer = std::io::BufWriter::new(file);
        ciborium::ser::into_writer(&report, &mut buffer)
            .map_err(|e| format!("failed to write {}: {:?}", filename, e))?;
        info!("wrote {}", filename);
    }
    Ok(())
}
