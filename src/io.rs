use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};

use crate::costing::CostResult;
use crate::inputs::Inputs;
use crate::report::{display_name, top_capital_categories};
use crate::sensitivity::SensitivityResult;

/// Load a plant configuration from a TOML file.
pub fn load_toml(path: &str) -> Result<(Inputs, String)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {path}"))?;
    let inputs: Inputs =
        toml::from_str(&text).with_context(|| format!("failed to parse config: {path}"))?;
    Ok((inputs, text))
}

pub struct CsvWriter {
    w: BufWriter<File>,
}

impl CsvWriter {
    pub fn create(path: &str) -> Result<Self> {
        let f = File::create(path)
            .with_context(|| format!("failed to create output file: {path}"))?;
        Ok(Self {
            w: BufWriter::new(f),
        })
    }

    /// Ranked sensitivity table, highest |elasticity| first, with skipped
    /// parameters appended as error rows.
    pub fn write_sensitivity(&mut self, result: &SensitivityResult) -> Result<()> {
        writeln!(
            self.w,
            "rank,parameter,path,value,delta,perturbed_lcoe,derivative,elasticity,status"
        )?;
        for (rank, entry) in result.entries.iter().enumerate() {
            writeln!(
                self.w,
                "{},{},{},{:.6},{:.6e},{:.6},{:.6e},{:.6},ok",
                rank + 1,
                display_name(&entry.path),
                entry.path,
                entry.value,
                entry.delta,
                entry.perturbed_objective,
                entry.derivative,
                entry.elasticity
            )?;
        }
        for failure in &result.failures {
            writeln!(
                self.w,
                ",{},{},{:.6},,,,,skipped: {}",
                display_name(&failure.path),
                failure.path,
                failure.value,
                failure.error.replace(',', ";").replace('\n', "; ")
            )?;
        }
        Ok(())
    }

    /// Largest baseline capital accounts, appended below the ranked table.
    pub fn write_capital_section(&mut self, result: &CostResult, n: usize) -> Result<()> {
        writeln!(self.w)?;
        writeln!(self.w, "# Top capital cost categories [M$]")?;
        writeln!(self.w, "account,value_musd")?;
        for cat in top_capital_categories(result, n) {
            writeln!(self.w, "{},{:.4}", cat.path, cat.value_musd)?;
        }
        Ok(())
    }

    /// Cost breakdown: every positive capital account plus the headline
    /// annualized figures and LCOE.
    pub fn write_costs(&mut self, result: &CostResult) -> Result<()> {
        writeln!(self.w, "account,value_musd")?;
        for cat in top_capital_categories(result, usize::MAX) {
            writeln!(self.w, "{},{:.4}", cat.path, cat.value_musd)?;
        }
        writeln!(self.w, "total_capital.c990000,{:.4}", result.capital.c990000)?;
        writeln!(
            self.w,
            "annualized.c900000,{:.4}",
            result.annualized.c900000
        )?;
        writeln!(
            self.w,
            "annualized.c700000,{:.4}",
            result.annualized.c700000
        )?;
        writeln!(
            self.w,
            "annualized.c800000,{:.4}",
            result.annualized.c800000
        )?;
        writeln!(
            self.w,
            "lcoe_usd_per_mwh,{:.4}",
            result.lcoe.c1000000
        )?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }
}
