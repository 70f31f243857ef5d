//! Property-based tests for symbiotic-evo
//!
//! Uses proptest to verify the population invariants under arbitrary sizes,
//! rates and seeds.

use proptest::prelude::*;
use symbiotic_evo::prelude::*;

fn partial_population(
    pop_size: usize,
    chrom_len: usize,
    mutation_rate: f64,
    crossover_rate: f64,
    seed: u64,
) -> PartialPopulation {
    let config = PopulationConfig::new(pop_size, chrom_len, mutation_rate, crossover_rate);
    PartialPopulation::new(&config, &mut seeded_rng(seed)).unwrap()
}

proptest! {
    // ==================== Construction Properties ====================

    #[test]
    fn partial_construction_sizes(
        pop_size in 4usize..40,
        chrom_len in 1usize..30,
        seed in any::<u64>()
    ) {
        let partial = partial_population(pop_size, chrom_len, 0.1, 0.8, seed);
        prop_assert_eq!(partial.len(), pop_size);
        prop_assert!(partial.iter().all(|p| p.len() == chrom_len));
        prop_assert!(partial.iter().all(|p| !p.is_evaluated()));
    }

    #[test]
    fn whole_construction_references_resolve(
        partial_size in 4usize..30,
        whole_size in 4usize..30,
        chrom_len in 1usize..12,
        seed in any::<u64>()
    ) {
        let partial = partial_population(partial_size, 5, 0.1, 0.8, seed);
        let config = PopulationConfig::new(whole_size, chrom_len, 0.05, 0.9);
        let whole = WholePopulation::new(&config, &partial, &mut seeded_rng(seed ^ 1)).unwrap();

        prop_assert_eq!(whole.len(), whole_size);
        prop_assert!(whole.iter().all(|w| w.len() == chrom_len));
        prop_assert!(whole.validate_references(&partial).is_ok());
    }

    #[test]
    fn undersized_population_rejected(pop_size in 0usize..4, seed in any::<u64>()) {
        let config = PopulationConfig::new(pop_size, 5, 0.1, 0.8);
        prop_assert!(PartialPopulation::new(&config, &mut seeded_rng(seed)).is_err());
    }

    // ==================== Crossover Properties ====================

    #[test]
    fn partial_crossover_preserves_shape(
        pop_size in 4usize..40,
        chrom_len in 1usize..30,
        mutation_rate in 0.0f64..=1.0,
        crossover_rate in 0.0f64..=1.0,
        seed in any::<u64>()
    ) {
        let mut partial = partial_population(pop_size, chrom_len, mutation_rate, crossover_rate, seed);
        let mut rng = seeded_rng(seed.wrapping_add(1));
        for _ in 0..3 {
            partial.crossover(&mut rng).unwrap();
        }
        prop_assert_eq!(partial.len(), pop_size);
        prop_assert!(partial.iter().all(|p| p.genome().len() == chrom_len));
    }

    #[test]
    fn partial_crossover_keeps_elite(
        pop_size in 4usize..40,
        crossover_rate in 0.0f64..=1.0,
        seed in any::<u64>()
    ) {
        let mut partial = partial_population(pop_size, 8, 0.5, crossover_rate, seed);
        let elite = partial.population().elite_count();
        let before: Vec<BitString> = partial.iter().map(|p| p.genome().clone()).collect();

        partial.crossover(&mut seeded_rng(seed ^ 7)).unwrap();
        for (i, genome) in before.iter().enumerate().take(elite) {
            prop_assert_eq!(partial[i].genome(), genome);
        }
    }

    #[test]
    fn zero_crossover_rate_is_identity(
        pop_size in 4usize..30,
        chrom_len in 1usize..20,
        seed in any::<u64>()
    ) {
        let mut partial = partial_population(pop_size, chrom_len, 1.0, 0.0, seed);
        let before = partial.individuals().to_vec();
        let summary = partial.crossover(&mut seeded_rng(seed ^ 3)).unwrap();

        prop_assert_eq!(summary.offspring, 0);
        prop_assert_eq!(partial.individuals(), before.as_slice());
    }

    #[test]
    fn whole_crossover_never_dangles(
        whole_size in 4usize..30,
        chrom_len in 1usize..12,
        mutation_rate in 0.0f64..=1.0,
        crossover_rate in 0.0f64..=1.0,
        seed in any::<u64>()
    ) {
        let partial = partial_population(10, 4, 0.1, 0.8, seed);
        let config = PopulationConfig::new(whole_size, chrom_len, mutation_rate, crossover_rate);
        let mut whole = WholePopulation::new(&config, &partial, &mut seeded_rng(seed ^ 5)).unwrap();
        let mut rng = seeded_rng(seed ^ 9);
        for _ in 0..3 {
            whole.crossover(&partial, &mut rng).unwrap();
            prop_assert!(whole.validate_references(&partial).is_ok());
        }
        prop_assert!(whole.iter().all(|w| w.len() == chrom_len));
    }

    #[test]
    fn equal_cuts_copy_parent_a(
        a in prop::collection::vec(any::<bool>(), 1..40),
        seed in any::<u64>()
    ) {
        let b: Vec<bool> = a.iter().map(|bit| !bit).collect();
        let cut = (seed as usize) % a.len();
        let child = TwoPointCrossover::offspring(&a, &b, cut, cut).unwrap();
        prop_assert_eq!(child, a);
    }

    #[test]
    fn two_point_offspring_takes_window_from_b(
        a in prop::collection::vec(any::<bool>(), 2..40),
        c1 in any::<usize>(),
        c2 in any::<usize>()
    ) {
        let b: Vec<bool> = a.iter().map(|bit| !bit).collect();
        let (lo, hi) = TwoPointCrossover::normalize_cuts(c1 % a.len(), c2 % a.len());
        let child = TwoPointCrossover::offspring(&a, &b, lo, hi).unwrap();

        for (i, gene) in child.iter().enumerate() {
            let expected = if (lo..hi).contains(&i) { b[i] } else { a[i] };
            prop_assert_eq!(*gene, expected);
        }
    }

    // ==================== Mutation Properties ====================

    #[test]
    fn bit_flip_counts_changes(
        bits in prop::collection::vec(any::<bool>(), 1..60),
        rate in 0.0f64..=1.0,
        seed in any::<u64>()
    ) {
        let original = BitString::new(bits);
        let mut genome = original.clone();
        let flipped = BitFlipMutation::new()
            .mutate(&mut genome, rate, &mut seeded_rng(seed))
            .unwrap();

        prop_assert_eq!(genome.len(), original.len());
        prop_assert_eq!(flipped, genome.hamming_distance(&original));
    }

    #[test]
    fn reference_resampling_stays_in_range(
        population_len in 1usize..50,
        chrom_len in 1usize..20,
        seed in any::<u64>()
    ) {
        let resampler = ReferenceResampling::new(population_len, 3);
        let mut genome = ReferenceChromosome::new(vec![PartialRef::new(0, 3); chrom_len]);
        resampler.mutate(&mut genome, 1.0, &mut seeded_rng(seed)).unwrap();

        prop_assert!(genome.iter().all(|r| r.index() < population_len && r.version() == 3));
    }

    // ==================== Fitness Properties ====================

    #[test]
    fn reset_fitness_restores_sentinel(
        fitness in prop::collection::vec(-100.0f64..100.0, 4..20),
        seed in any::<u64>()
    ) {
        let mut partial = partial_population(fitness.len(), 3, 0.1, 0.8, seed);
        for (i, &f) in fitness.iter().enumerate() {
            partial.set_fitness(i, f).unwrap();
        }
        partial.reset_fitness();
        prop_assert!(partial.iter().all(|p| p.fitness() == UNEVALUATED));
    }

    #[test]
    fn credit_never_raises_partial_fitness(
        partial_fitness in prop::collection::vec(-50.0f64..50.0, 8),
        whole_fitness in prop::collection::vec(-50.0f64..50.0, 6),
        seed in any::<u64>()
    ) {
        let mut partial = partial_population(8, 4, 0.1, 0.8, seed);
        for (i, &f) in partial_fitness.iter().enumerate() {
            partial.set_fitness(i, f).unwrap();
        }
        let config = PopulationConfig::new(6, 3, 0.1, 0.8);
        let mut whole = WholePopulation::new(&config, &partial, &mut seeded_rng(seed ^ 11)).unwrap();
        for (individual, &f) in whole.individuals_mut().iter_mut().zip(&whole_fitness) {
            individual.set_fitness(f);
        }

        let before: Vec<f64> = partial.iter().map(|p| p.fitness()).collect();
        partial.assign_credit(&whole).unwrap();

        for (member, old) in partial.iter().zip(&before) {
            prop_assert!(member.fitness() <= *old);
        }
        for assembly in whole.iter() {
            for &handle in assembly.genome() {
                prop_assert!(partial.resolve(handle).unwrap().fitness() <= assembly.fitness());
            }
        }
    }

    #[test]
    fn sort_then_remap_preserves_assemblies(
        fitness in prop::collection::vec(-50.0f64..50.0, 10),
        seed in any::<u64>()
    ) {
        let mut partial = partial_population(10, 4, 0.1, 0.8, seed);
        for (i, &f) in fitness.iter().enumerate() {
            partial.set_fitness(i, f).unwrap();
        }
        let config = PopulationConfig::new(5, 4, 0.1, 0.8);
        let mut whole = WholePopulation::new(&config, &partial, &mut seeded_rng(seed ^ 13)).unwrap();
        let assemblies = |whole: &WholePopulation, partial: &PartialPopulation| -> Vec<Vec<BitString>> {
            whole
                .iter()
                .map(|w| {
                    w.genome()
                        .iter()
                        .map(|&r| partial.resolve(r).unwrap().genome().clone())
                        .collect()
                })
                .collect()
        };
        let before = assemblies(&whole, &partial);

        let reordering = partial.sort_by_fitness();
        whole.remap_references(&reordering).unwrap();

        prop_assert_eq!(assemblies(&whole, &partial), before);
        let ranked: Vec<f64> = partial.iter().map(|p| p.fitness()).collect();
        prop_assert!(ranked.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn signed_positional_sum_is_non_negative(
        bits in prop::collection::vec(any::<bool>(), 0..64)
    ) {
        let genome = BitString::new(bits);
        prop_assert!(SignedPositionalSum::new().score(&[&genome]) >= 0.0);
    }
}
