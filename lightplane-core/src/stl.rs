/// STL reader producing flat vertex buffers (binary and ASCII)
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::{all_consuming, opt},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u32},
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{ProjectionError, Result};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Facet = [f32; 9];

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Vec<f32>> {
    if data.len() < HEADER_LEN + 4 {
        return Err(ProjectionError::Stl("file too small to be a valid STL".to_string()));
    }

    let (body, facet_count) = binary_header(data)
        .map_err(|e| ProjectionError::Stl(format!("bad header: {e:?}")))?;
    let facet_count = facet_count as usize;

    if body.len() < facet_count * FACET_LEN {
        return Err(ProjectionError::Stl(format!(
            "expected {facet_count} facets, found {} bytes",
            body.len()
        )));
    }

    let (_, facets) = count(binary_facet, facet_count)(body)
        .map_err(|e| ProjectionError::Stl(format!("bad facet: {e:?}")))?;

    Ok(flatten(facets))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    // Normal is recomputable from winding; drop it
    let (input, _) = take(12usize)(input)?;
    let (input, coords) = count(le_f32, 9)(input)?;
    // Attribute byte count
    let (input, _) = take(2usize)(input)?;

    let mut facet = [0.0; 9];
    facet.copy_from_slice(&coords);
    Ok((input, facet))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Vec<f32>> {
    match all_consuming(ascii_solid)(input) {
        Ok((_, facets)) => Ok(flatten(facets)),
        Err(e) => Err(ProjectionError::Stl(format!("malformed ASCII STL: {e:?}"))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = opt(not_line_ending)(input)?; // Optional name
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = terminated(opt(not_line_ending), multispace0)(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = ascii_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]]))
}

fn ascii_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    ascii_vector3(input)
}

fn ascii_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}

fn flatten(facets: Vec<Facet>) -> Vec<f32> {
    facets.into_iter().flatten().collect()
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Vec<f32>> {
    // Binary files may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(buffer) = parse_ascii_stl(text) {
                return Ok(buffer);
            }
        }
    }

    parse_binary_stl(data)
}
